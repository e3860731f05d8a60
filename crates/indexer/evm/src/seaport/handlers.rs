//! Decoders turning Seaport logs into attribute maps.

use alloy::rpc::types::Log;

use super::{CounterIncremented, OrderCancelled, OrderFulfilled, OrderValidated, OrdersMatched};
use crate::{
    error::ParserError,
    handler::{attributes, extract_log, format_address, format_hash, EventAttributes},
};

pub fn counter_incremented(log: &Log) -> Result<EventAttributes, ParserError> {
    let event = extract_log::<CounterIncremented>(log, "CounterIncremented")?;

    Ok(attributes([
        ("newCounter", event.newCounter.to_string()),
        ("offerer", format_address(&event.offerer)),
    ]))
}

pub fn order_cancelled(log: &Log) -> Result<EventAttributes, ParserError> {
    let event = extract_log::<OrderCancelled>(log, "OrderCancelled")?;

    Ok(attributes([
        ("orderHash", format_hash(&event.orderHash)),
        ("offerer", format_address(&event.offerer)),
        ("zone", format_address(&event.zone)),
    ]))
}

/// Item arrays are summarized by their lengths.
pub fn order_fulfilled(log: &Log) -> Result<EventAttributes, ParserError> {
    let event = extract_log::<OrderFulfilled>(log, "OrderFulfilled")?;

    Ok(attributes([
        ("orderHash", format_hash(&event.orderHash)),
        ("offerer", format_address(&event.offerer)),
        ("zone", format_address(&event.zone)),
        ("recipient", format_address(&event.recipient)),
        ("offerItemCount", event.offer.len().to_string()),
        ("considerationCount", event.consideration.len().to_string()),
    ]))
}

pub fn order_validated(log: &Log) -> Result<EventAttributes, ParserError> {
    let event = extract_log::<OrderValidated>(log, "OrderValidated")?;
    let params = &event.orderParameters;

    Ok(attributes([
        ("orderHash", format_hash(&event.orderHash)),
        ("offerer", format_address(&params.offerer)),
        ("zone", format_address(&params.zone)),
        ("orderType", params.orderType.to_string()),
        ("startTime", params.startTime.to_string()),
        ("endTime", params.endTime.to_string()),
        ("salt", params.salt.to_string()),
        ("conduitKey", format_hash(&params.conduitKey)),
        ("offerCount", params.offer.len().to_string()),
        ("considerCount", params.consideration.len().to_string()),
    ]))
}

pub fn orders_matched(log: &Log) -> Result<EventAttributes, ParserError> {
    let event = extract_log::<OrdersMatched>(log, "OrdersMatched")?;

    let hashes: Vec<String> = event.orderHashes.iter().map(format_hash).collect();
    Ok(attributes([("orderHashes", hashes.join(","))]))
}
