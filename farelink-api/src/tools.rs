use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use farelink_core::booking::CreateBookingRequest;
use farelink_core::{CoreError, CoreResult, LocationType};

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct ToolDefinition {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

#[derive(Debug, Serialize)]
struct ToolsResponse {
    tools: Vec<ToolDefinition>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(invoke_tool))
}

async fn list_tools() -> Json<ToolsResponse> {
    info!("Listing available tools");
    Json(ToolsResponse {
        tools: vec![
            ToolDefinition {
                name: "search_locations".to_string(),
                description: "Search for airports and cities based on a keyword, optionally \
                              filtered by type (AIRPORT or CITY)."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "keyword": {"type": "string", "description": "Search term to match airports/cities"},
                        "type": {"type": "string", "enum": ["AIRPORT", "CITY"]}
                    },
                    "required": ["keyword"]
                }),
            },
            ToolDefinition {
                name: "get_flight_destinations".to_string(),
                description: "Get all direct flight destinations from an origin airport IATA code \
                              (e.g., 'BOM')."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "origin": {"type": "string", "description": "3-letter IATA code of the origin airport"}
                    },
                    "required": ["origin"]
                }),
            },
            ToolDefinition {
                name: "search_flights".to_string(),
                description: "Search available flights by origin, destination, departure date and \
                              number of adults (1-9)."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "origin": {"type": "string"},
                        "destination": {"type": "string"},
                        "departure_date": {"type": "string", "description": "Date of departure (YYYY-MM-DD)"},
                        "adults": {"type": "integer", "minimum": 1, "maximum": 9}
                    },
                    "required": ["origin", "destination", "departure_date"]
                }),
            },
            ToolDefinition {
                name: "get_flight_offer_price".to_string(),
                description: "Get the final price for a flight offer from search results, \
                              including taxes and fees."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "flight_offer": {"type": "object"}
                    },
                    "required": ["flight_offer"]
                }),
            },
            ToolDefinition {
                name: "create_booking".to_string(),
                description: "Create a flight booking from a flight offer plus traveler details, \
                              or a stored flight id plus passenger and contact details."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "flight_offer": {"type": "object"},
                        "travelers": {"type": "array", "items": {"type": "object"}},
                        "flight_id": {"type": "string"},
                        "passengers": {"type": "array", "items": {"type": "object"}},
                        "contact_email": {"type": "string"},
                        "contact_phone": {"type": "string"}
                    }
                }),
            },
            ToolDefinition {
                name: "get_booking".to_string(),
                description: "Retrieve details of an existing booking by its unique identifier."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "booking_id": {"type": "string"}
                    },
                    "required": ["booking_id"]
                }),
            },
            ToolDefinition {
                name: "cancel_booking".to_string(),
                description: "Cancel an existing flight booking. Check the 'status' field in the \
                              result."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "booking_id": {"type": "string"}
                    },
                    "required": ["booking_id"]
                }),
            },
        ],
    })
}

/// Tool calls never surface HTTP errors for orchestrator failures; agent
/// callers get a structured `status` payload instead.
async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> Json<Value> {
    info!("Tool invoked: {}", name);
    let booking_id = args
        .get("booking_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    match dispatch(&state, &name, args).await {
        Ok(value) => Json(value),
        Err(err) => Json(failure_payload(err, booking_id.as_deref())),
    }
}

async fn dispatch(state: &AppState, name: &str, args: Value) -> CoreResult<Value> {
    match name {
        "search_locations" => {
            let keyword = require_str(&args, "keyword")?;
            let location_type = args
                .get("type")
                .and_then(Value::as_str)
                .map(str::parse::<LocationType>)
                .transpose()?;
            let locations = state.service.search_locations(keyword, location_type).await?;
            Ok(Value::Array(locations))
        }
        "get_flight_destinations" => {
            let origin = require_str(&args, "origin")?;
            let destinations = state.service.get_destinations(origin).await?;
            Ok(Value::Array(destinations))
        }
        "search_flights" => {
            let origin = require_str(&args, "origin")?;
            let destination = require_str(&args, "destination")?;
            let departure_date = parse_date(require_str(&args, "departure_date")?)?;
            let adults = args.get("adults").and_then(Value::as_u64).unwrap_or(1) as u32;
            let offers = state
                .service
                .search_flights(origin, destination, departure_date, adults)
                .await?;
            Ok(Value::Array(offers))
        }
        "get_flight_offer_price" => {
            let offer = args
                .get("flight_offer")
                .ok_or_else(|| CoreError::validation("flight_offer is required"))?;
            state.service.price_offer(offer).await
        }
        "create_booking" => {
            let request: CreateBookingRequest = serde_json::from_value(args)
                .map_err(|e| CoreError::validation(format!("Malformed booking request: {}", e)))?;
            state.service.create_booking(&request).await
        }
        "get_booking" => {
            let booking_id = require_str(&args, "booking_id")?;
            state.service.get_booking(booking_id).await
        }
        "cancel_booking" => {
            let booking_id = require_str(&args, "booking_id")?;
            state.service.cancel_booking(booking_id).await?;
            Ok(json!({
                "status": "cancelled",
                "booking_id": booking_id,
            }))
        }
        other => Err(CoreError::validation(format!("Unknown tool: {}", other))),
    }
}

fn failure_payload(err: CoreError, booking_id: Option<&str>) -> Value {
    match err {
        CoreError::NotFound(_) => {
            let mut payload = json!({ "status": "not_found" });
            if let Some(id) = booking_id {
                payload["booking_id"] = json!(id);
            }
            payload
        }
        err => json!({
            "status": "failed",
            "message": err.to_string(),
        }),
    }
}

fn require_str<'a>(args: &'a Value, key: &str) -> CoreResult<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::validation(format!("{} is required", key)))
}

fn parse_date(raw: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CoreError::validation(format!("departure_date must be YYYY-MM-DD, got {:?}", raw)))
}
