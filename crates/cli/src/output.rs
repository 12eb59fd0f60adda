use crate::error::CliError;
use model::{CustomFilter, Operator, catalog::fields::FieldDescriptor};
use serde::Serialize;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(CliError::JsonSerialize)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", to_json(value)?);
    Ok(())
}

pub fn print_operators(operators: &[&Operator]) {
    println!(
        "{:<10} {:<12} {:<12} {:<8} {}",
        "Code", "Family", "Symbol", "Label", "Description"
    );
    println!("{}", "-".repeat(64));
    for op in operators {
        println!(
            "{:<10} {:<12} {:<12} {:<8} {}",
            op.code.as_str(),
            op.family.as_str(),
            op.symbol,
            op.label,
            op.description
        );
    }
}

pub fn print_fields(fields: &[&FieldDescriptor]) {
    println!(
        "{:<20} {:<24} {:>10} {:>10} {:<4} {}",
        "Field", "Label", "Min", "Max", "Abs", "Description"
    );
    println!("{}", "-".repeat(80));
    for field in fields {
        println!(
            "{:<20} {:<24} {:>10} {:>10} {:<4} {}",
            field.field,
            field.label,
            field.min,
            field.max,
            if field.has_abs { "yes" } else { "no" },
            field.description
        );
    }
}

pub fn print_filters(filters: &[CustomFilter]) {
    if filters.is_empty() {
        println!("No saved filters");
        return;
    }

    println!("{:<26} {:<24} {:<6} {}", "ID", "Label", "Steps", "Result");
    println!("{}", "-".repeat(64));
    for filter in filters {
        println!(
            "{:<26} {:<24} {:<6} {}",
            filter.id.as_str(),
            filter.label,
            filter.steps.len(),
            if filter.is_boolean { "boolean" } else { "value" }
        );
    }
}
