use std::io::Read;

use serde::Deserialize;

use crate::workflows::merge::FieldPair;

/// One exported comparison row: `Label,Left,Right[,Conflicting]`.
#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Left", default)]
    left: String,
    #[serde(rename = "Right", default)]
    right: String,
    #[serde(
        rename = "Conflicting",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    conflicting: Option<String>,
}

impl SnapshotRow {
    fn into_field_pair(self) -> FieldPair {
        let conflicting = self.conflicting.as_deref().map_or(true, parse_flag);
        FieldPair::new(self.label, self.left, self.right).with_conflicting(conflicting)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1" | "y"
    )
}

pub(super) fn read_csv_fields<R: Read>(reader: R) -> Result<Vec<FieldPair>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut fields = Vec::new();
    for record in csv_reader.deserialize::<SnapshotRow>() {
        let row = record?;
        if row.label.trim().is_empty() {
            continue;
        }
        fields.push(row.into_field_pair());
    }
    Ok(fields)
}
