//! Extraction of the counts table embedded in an Infogram page.
//!
//! The page ships its dataset inline as a `window.infographicData = {...};`
//! assignment; the table lives in the `data` of the first responsive chart
//! entity. The upstream schema is assumed stable, so any deviation is
//! surfaced as an error rather than recovered from.

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::table::WideTable;

const DATA_MARKER: &str = r"(?s)window\.infographicData\s*=\s*(\{.*?\});";
const CHART_TYPE: &str = "RESPONSIVE_CHART";

/// Pulls the embedded `infographicData` JSON out of the page text.
///
/// # Errors
///
/// Returns an error if the assignment marker is absent or the captured
/// text is not valid JSON.
pub fn parse_payload(html: &str) -> Result<Value> {
    let marker = Regex::new(DATA_MARKER)?;

    let captures = marker
        .captures(html)
        .context("page has no embedded infographicData assignment")?;

    serde_json::from_str(&captures[1]).context("embedded infographicData is not valid JSON")
}

/// Finds the first chart entity's table within the payload.
pub fn chart_table(payload: &Value) -> Result<WideTable> {
    let entities = payload
        .pointer("/elements/content/content/entities")
        .and_then(Value::as_object)
        .context("infographicData has no entities map")?;

    for (id, entity) in entities {
        if entity.get("type").and_then(Value::as_str) != Some(CHART_TYPE) {
            continue;
        }
        let Some(data) = entity.get("data").and_then(Value::as_array) else {
            continue;
        };

        debug!(entity = %id, "Found chart entity");
        let table = data
            .first()
            .and_then(Value::as_array)
            .context("chart entity has an empty data array")?;
        return to_wide_table(table);
    }

    bail!("no chart entity with a data table in infographicData");
}

fn to_wide_table(table: &[Value]) -> Result<WideTable> {
    let mut rows = table.iter().map(|row| {
        let cells = row.as_array().context("chart table row is not an array")?;
        cells.iter().map(cell_text).collect::<Result<Vec<_>>>()
    });

    let header = rows.next().context("chart table has no header row")??;
    let rows = rows.collect::<Result<Vec<_>>>()?;

    Ok(WideTable { header, rows })
}

/// Chart cells are either bare scalars or objects wrapping a `value`.
fn cell_text(cell: &Value) -> Result<String> {
    match cell {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Object(o) => match o.get("value") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => bail!("chart cell object has no usable value"),
        },
        _ => bail!("unsupported chart cell: {cell}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_with_entities(entities: Value) -> Value {
        json!({
            "elements": {
                "content": {
                    "content": {
                        "entities": entities
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_payload_extracts_the_assignment() {
        let html = r#"<html><script>window.infographicData = {"a": 1};</script></html>"#;

        let payload = parse_payload(html).unwrap();

        assert_eq!(payload, json!({"a": 1}));
    }

    #[test]
    fn test_missing_marker_is_an_error() {
        let err = parse_payload("<html><body>nothing here</body></html>").unwrap_err();

        assert!(err.to_string().contains("infographicData"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let html = "<script>window.infographicData = {broken};</script>";

        assert!(parse_payload(html).is_err());
    }

    #[test]
    fn test_chart_table_skips_non_chart_entities() {
        let payload = payload_with_entities(json!({
            "aaa": {"type": "TEXT", "data": [[["ignored"]]]},
            "bbb": {
                "type": "RESPONSIVE_CHART",
                "data": [[
                    [{"value": "Month"}, {"value": "2019"}],
                    [{"value": "May"}, {"value": "11,642,886"}]
                ]]
            }
        }));

        let table = chart_table(&payload).unwrap();

        assert_eq!(table.header, ["Month", "2019"]);
        assert_eq!(table.rows, [["May".to_string(), "11,642,886".to_string()]]);
    }

    #[test]
    fn test_bare_string_and_numeric_cells_are_accepted() {
        let payload = payload_with_entities(json!({
            "chart": {
                "type": "RESPONSIVE_CHART",
                "data": [[["Month", 2019], ["May", 11642886]]]
            }
        }));

        let table = chart_table(&payload).unwrap();

        assert_eq!(table.header, ["Month", "2019"]);
        assert_eq!(table.rows, [["May".to_string(), "11642886".to_string()]]);
    }

    #[test]
    fn test_missing_chart_entity_is_an_error() {
        let payload = payload_with_entities(json!({
            "aaa": {"type": "TEXT"},
            "bbb": {"type": "RESPONSIVE_CHART"}
        }));

        let err = chart_table(&payload).unwrap_err();

        assert!(err.to_string().contains("no chart entity"));
    }

    #[test]
    fn test_chart_with_empty_data_is_an_error() {
        let payload = payload_with_entities(json!({
            "chart": {"type": "RESPONSIVE_CHART", "data": []}
        }));

        let err = chart_table(&payload).unwrap_err();

        assert!(err.to_string().contains("empty data array"));
    }

    #[test]
    fn test_missing_entities_path_is_an_error() {
        let payload = json!({"elements": {}});

        assert!(chart_table(&payload).is_err());
    }
}
