use std::process;

use serde::Serialize;

use kiri_core::dict::{parse_features, DictError, FeatureSchema, WordAttributes, WorkDictionary};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, Serialize)]
pub struct FeatureReport {
    pub fields: Vec<String>,
    pub schema: String,
    #[serde(flatten)]
    pub attributes: WordAttributes,
}

pub fn inspect(record: &str) -> Result<FeatureReport, DictError> {
    let fields = parse_features(record);
    let schema = FeatureSchema::detect(fields.len());

    let mut dict = WorkDictionary::new();
    dict.add(0, "", 0, 0, 0, Some(record))?;
    Ok(FeatureReport {
        fields,
        schema: format!("{schema:?}"),
        attributes: dict.attributes(0),
    })
}

pub fn features_cmd(record: &str, json: bool) {
    let report = die!(inspect(record), "Error: {}");
    if json {
        println!(
            "{}",
            die!(serde_json::to_string_pretty(&report), "Error: {}")
        );
        return;
    }

    println!("schema: {} ({} fields)", report.schema, report.fields.len());
    for (i, field) in report.fields.iter().enumerate() {
        println!("  [{i:>2}] {field}");
    }
    let a = &report.attributes;
    println!("part of speech:  {}", a.part_of_speech);
    println!("base form:       {}", a.base_form);
    println!("reading:         {}", a.reading);
    println!("pronunciation:   {}", a.pronunciation);
    println!("inflection type: {}", a.inflection_type);
    println!("inflection form: {}", a.inflection_form);
}
