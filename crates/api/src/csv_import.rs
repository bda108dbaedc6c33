// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV parsing for bulk employee import.
//!
//! This module only turns CSV text into employee requests; it never
//! touches storage. Headers are matched case-insensitively with spaces and
//! punctuation folded to `_`, and common spreadsheet spellings are
//! accepted as aliases (`Mobile Number` for `phone`, `DOJ` for
//! `hire_date`, ...).

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord, Trim};
use ems_domain::{format_date, parse_date};
use time::{Date, Month};

use crate::error::ApiError;
use crate::request_response::CreateEmployeeRequest;

/// Header aliases per field, already normalized.
const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("full_name", &["full_name", "name", "employee_name"]),
    ("first_name", &["first_name"]),
    ("last_name", &["last_name", "surname"]),
    ("father_name", &["father_name", "fathers_name"]),
    ("gender", &["gender"]),
    ("marital_status", &["marital_status"]),
    ("date_of_birth", &["date_of_birth", "dob"]),
    ("email", &["email", "email_address"]),
    ("phone", &["phone", "mobile_number", "phone_number", "mobile"]),
    (
        "adhar_number",
        &["adhar_number", "aadhaar_number", "aadhar_number", "aadhaar"],
    ),
    ("pan_number", &["pan_number", "pan_card_number", "pan"]),
    ("address", &["address", "permanent_address"]),
    ("department", &["department", "department_name"]),
    ("department_id", &["department_id"]),
    ("site_id", &["site_id", "site"]),
    ("salary_code", &["salary_code", "salarycode"]),
    ("designation", &["designation", "position"]),
    ("skill_category", &["skill_category", "skills", "category"]),
    (
        "hire_date",
        &["hire_date", "date_of_joining", "joining_date", "doj"],
    ),
    ("employment_status", &["employment_status", "status"]),
    ("pf_applicable", &["pf_applicable", "pf_applicability", "pf"]),
    (
        "esic_applicable",
        &["esic_applicable", "esic_applicability", "esic"],
    ),
];

/// One CSV row turned into a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvEmployee {
    pub request: CreateEmployeeRequest,
    /// Department given by name; resolved against storage by the caller.
    pub department_name: Option<String>,
}

/// Parse outcome of one data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based, not counting the header.
    pub row_number: usize,
    pub result: Result<CsvEmployee, Vec<String>>,
}

/// Normalizes a header for alias matching.
fn normalize_header(header: &str) -> String {
    let folded: String = header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    folded
        .split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("_")
}

/// Maps each known field to its column index.
fn map_headers(headers: &StringRecord) -> Result<HashMap<&'static str, usize>, ApiError> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut columns: HashMap<&'static str, usize> = HashMap::new();
    for (field, aliases) in FIELD_ALIASES {
        if let Some(idx) = aliases
            .iter()
            .find_map(|alias| normalized.iter().position(|h| h == alias))
        {
            columns.insert(*field, idx);
        }
    }

    if !columns.contains_key("full_name") && !columns.contains_key("first_name") {
        return Err(ApiError::InvalidInput {
            field: String::from("file"),
            message: String::from("CSV must have a 'Full Name' or 'first_name' column"),
        });
    }
    Ok(columns)
}

/// Parses `YYYY-MM-DD`, `DD/MM/YYYY` or `DD-MM-YYYY`.
pub(crate) fn parse_flexible_date(value: &str) -> Option<Date> {
    let value: &str = value.trim();
    if let Ok(date) = parse_date(value) {
        return Some(date);
    }
    let parts: Vec<&str> = value.split(['/', '-']).collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let day: u8 = day.parse().ok()?;
    let month: Month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let year: i32 = year.parse().ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_uppercase().as_str(),
        "TRUE" | "1" | "YES" | "Y" | "T"
    )
}

fn parse_record(record: &StringRecord, columns: &HashMap<&'static str, usize>) -> Result<CsvEmployee, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let get = |field: &str| -> Option<String> {
        columns
            .get(field)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let mut get_date = |field: &str| -> Option<String> {
        let raw: String = get(field)?;
        parse_flexible_date(&raw).map(format_date).or_else(|| {
            errors.push(format!("{field}: invalid date '{raw}'"));
            None
        })
    };

    let date_of_birth: Option<String> = get_date("date_of_birth");
    let hire_date: Option<String> = get_date("hire_date");

    let (first_name, last_name): (String, Option<String>) = match get("first_name") {
        Some(first) => (first, get("last_name")),
        None => match get("full_name") {
            Some(full) => {
                let mut parts = full.splitn(2, char::is_whitespace);
                let first: String = parts.next().unwrap_or_default().to_string();
                let last: Option<String> = parts
                    .next()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
                (first, last.or_else(|| get("last_name")))
            }
            None => {
                errors.push(String::from("name: required field is missing or empty"));
                (String::new(), None)
            }
        },
    };

    let department_id: Option<i64> = get("department_id").and_then(|raw| {
        raw.parse::<i64>().map_or_else(
            |_| {
                errors.push(format!("department_id: invalid number '{raw}'"));
                None
            },
            Some,
        )
    });

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CsvEmployee {
        request: CreateEmployeeRequest {
            first_name,
            last_name,
            father_name: get("father_name"),
            gender: get("gender"),
            marital_status: get("marital_status"),
            date_of_birth,
            email: get("email"),
            phone: get("phone"),
            adhar_number: get("adhar_number"),
            pan_number: get("pan_number"),
            address: get("address"),
            department_id,
            site_id: get("site_id"),
            salary_code: get("salary_code"),
            designation: get("designation"),
            skill_category: get("skill_category"),
            hire_date,
            employment_status: get("employment_status"),
            pf_applicable: get("pf_applicable").map(|v| parse_flag(&v)),
            esic_applicable: get("esic_applicable").map(|v| parse_flag(&v)),
        },
        department_name: get("department"),
    })
}

/// Parses an employee CSV into per-row results.
///
/// A malformed row is reported and skipped; it does not stop the rest of
/// the file.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the file has no header row or no
/// name column.
pub fn parse_employee_csv(content: &[u8]) -> Result<Vec<CsvRow>, ApiError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content);

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("file"),
            message: format!("Failed to read CSV header: {e}"),
        })?
        .clone();
    let columns: HashMap<&'static str, usize> = map_headers(&headers)?;

    let rows: Vec<CsvRow> = reader
        .records()
        .enumerate()
        .filter(|(_, record)| !matches!(record, Ok(r) if r.iter().all(str::is_empty)))
        .map(|(idx, record)| CsvRow {
            row_number: idx + 1,
            result: record
                .map_err(|e| vec![format!("Malformed row: {e}")])
                .and_then(|r| parse_record(&r, &columns)),
        })
        .collect();

    Ok(rows)
}
