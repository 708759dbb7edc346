//! CSV shipment (package-level detail) loader.
//!
//! Parses PLD CSV exports into `ShipmentRecord` structs. Expected
//! columns:
//!   shipment_id, weight, weight_unit, origin_zip, destination_zip,
//!   service, actual_cost
//! `origin_zip` and `actual_cost` may be blank. Zips stay strings so a
//! leading zero lost upstream can be restored at zone resolution.

use std::io::Read;

use serde::Deserialize;

use rateshop_core::WeightUnit;

/// A raw shipment row, immutable once ingested.
#[derive(Debug, Clone, Deserialize)]
pub struct ShipmentRecord {
    pub shipment_id: String,
    pub weight: f64,
    #[serde(deserialize_with = "deserialize_unit")]
    pub weight_unit: WeightUnit,
    pub origin_zip: Option<String>,
    pub destination_zip: String,
    pub service: String,
    pub actual_cost: Option<f64>,
}

/// Load shipment records from a CSV reader.
pub fn load_shipments<R: Read>(reader: R) -> Result<Vec<ShipmentRecord>, String> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let record: ShipmentRecord = result
            .map_err(|e| format!("CSV parse error at line {}: {}", line_num + 2, e))?;
        records.push(record);
    }

    Ok(records)
}

/// Load shipment records from a CSV file path.
pub fn load_shipments_file(path: &str) -> Result<Vec<ShipmentRecord>, String> {
    let file =
        std::fs::File::open(path).map_err(|e| format!("Failed to open '{}': {}", path, e))?;
    load_shipments(file)
}

/// Flexible unit deserializer: handles "oz"/"ounce"/"ounces" and
/// "lb"/"lbs"/"pound"/"pounds" in any case.
fn deserialize_unit<'de, D>(deserializer: D) -> Result<WeightUnit, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.to_lowercase().trim() {
        "oz" | "ounce" | "ounces" => Ok(WeightUnit::Ounce),
        "lb" | "lbs" | "pound" | "pounds" => Ok(WeightUnit::Pound),
        other => Err(serde::de::Error::custom(format!(
            "expected weight unit, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
shipment_id,weight,weight_unit,origin_zip,destination_zip,service,actual_cost
SHP-0001,0.5,lb,84115,30301,UPS Ground,6.00
SHP-0002,15.5,oz,84115,90210,USPS Ground Advantage,7.45
SHP-0003,2.4,lbs,,60601,FedEx Home Delivery,
SHP-0004,12,oz,84115,7001,UPS 2nd Day Air,14.10
";

    #[test]
    fn load_sample_csv() {
        let records = load_shipments(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].shipment_id, "SHP-0001");
        assert_eq!(records[0].weight_unit, WeightUnit::Pound);
        assert!((records[0].weight - 0.5).abs() < 1e-9);
        assert_eq!(records[0].actual_cost, Some(6.00));
        assert_eq!(records[1].weight_unit, WeightUnit::Ounce);
    }

    #[test]
    fn blank_optionals_parse_as_none() {
        let records = load_shipments(SAMPLE_CSV.as_bytes()).unwrap();
        assert!(records[2].origin_zip.is_none());
        assert!(records[2].actual_cost.is_none());
    }

    #[test]
    fn zip_stays_a_string_with_leading_zero_loss_intact() {
        let records = load_shipments(SAMPLE_CSV.as_bytes()).unwrap();
        // "7001" is kept verbatim; zone resolution restores the zero.
        assert_eq!(records[3].destination_zip, "7001");
    }

    #[test]
    fn unit_parsing_handles_variants() {
        let csv_data = "\
shipment_id,weight,weight_unit,origin_zip,destination_zip,service,actual_cost
A,1,OZ,,30301,Ground,
B,1,Pounds,,30301,Ground,
C,1,ounce,,30301,Ground,
";
        let records = load_shipments(csv_data.as_bytes()).unwrap();
        assert_eq!(records[0].weight_unit, WeightUnit::Ounce);
        assert_eq!(records[1].weight_unit, WeightUnit::Pound);
        assert_eq!(records[2].weight_unit, WeightUnit::Ounce);
    }

    #[test]
    fn unknown_unit_is_a_parse_error() {
        let csv_data = "\
shipment_id,weight,weight_unit,origin_zip,destination_zip,service,actual_cost
A,1,stone,,30301,Ground,
";
        assert!(load_shipments(csv_data.as_bytes()).is_err());
    }
}
