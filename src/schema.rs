//! Schema resolution: maps the logical fields the engine needs (name,
//! address parts) to concrete column positions, once, before matching
//! begins. Resolution failure is a typed error; nothing downstream probes
//! columns dynamically.

use log::{debug, info};

use crate::error::SchemaError;
use crate::models::Table;

/// Ordered labels tried for the name-bearing column before falling back to
/// any header containing "name".
const NAME_CANDIDATES: &[&str] = &[
    "Name",
    "Customer/Grant: Company Name",
    "Company Name",
    "Account Name",
];

/// Known address column groups, tried in order. A group matches only when
/// every member is present.
const ADDRESS_GROUPS: &[&[&str]] = &[
    &["Street", "City", "State", "Zip", "Country"],
    &["Address 1", "Address 2", "City", "State", "Zip"],
    &["Street Address", "City", "State", "Postal Code"],
    &["Address", "City", "State", "Zip"],
];

/// Fallback: any header containing one of these (case-insensitive) is
/// treated as an address column.
const ADDRESS_PATTERNS: &[&str] = &["address", "addr", "street", "zip", "postal"];

#[derive(Debug, Clone)]
pub struct ResolvedColumn {
    pub header: String,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name_col: usize,
    pub address_cols: Vec<ResolvedColumn>,
}

/// Resolve the name column and address-column group of a table.
///
/// `require_address` is set for the registry side, where a table without
/// address columns cannot supply anything and is a configuration error. The
/// source side may legitimately carry no address columns.
pub fn resolve_schema(
    table: &Table,
    label: &'static str,
    require_address: bool,
) -> Result<TableSchema, SchemaError> {
    let name_col = resolve_name_column(table).ok_or(SchemaError::NameColumn { table: label })?;
    let address_cols = resolve_address_columns(table);
    if require_address && address_cols.is_empty() {
        return Err(SchemaError::AddressColumns { table: label });
    }
    info!(
        "{} table: name column {:?} (#{}), {} address column(s)",
        label, table.headers[name_col], name_col, address_cols.len()
    );
    Ok(TableSchema {
        name_col,
        address_cols,
    })
}

fn resolve_name_column(table: &Table) -> Option<usize> {
    for candidate in NAME_CANDIDATES {
        if let Some(idx) = table.column_index(candidate) {
            return Some(idx);
        }
    }
    table
        .headers
        .iter()
        .position(|h| h.to_lowercase().contains("name"))
}

fn resolve_address_columns(table: &Table) -> Vec<ResolvedColumn> {
    for group in ADDRESS_GROUPS {
        let resolved: Vec<ResolvedColumn> = group
            .iter()
            .filter_map(|header| {
                table.column_index(header).map(|index| ResolvedColumn {
                    header: table.headers[index].trim().to_string(),
                    index,
                })
            })
            .collect();
        if resolved.len() == group.len() {
            debug!("address group {:?} matched", group);
            return resolved;
        }
    }
    // fallback: pattern scan over headers, in header order
    table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            let lower = h.to_lowercase();
            ADDRESS_PATTERNS.iter().any(|p| lower.contains(p))
        })
        .map(|(index, h)| ResolvedColumn {
            header: h.trim().to_string(),
            index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> Table {
        Table::new(headers.iter().map(|h| h.to_string()).collect(), vec![])
    }

    #[test]
    fn resolves_known_address_group() {
        let t = table(&["Name", "Street", "City", "State", "Zip", "Country"]);
        let s = resolve_schema(&t, "registry", true).unwrap();
        assert_eq!(s.name_col, 0);
        let headers: Vec<&str> = s.address_cols.iter().map(|c| c.header.as_str()).collect();
        assert_eq!(headers, vec!["Street", "City", "State", "Zip", "Country"]);
    }

    #[test]
    fn group_match_requires_every_member() {
        // "Street" alone does not complete any group; pattern fallback kicks in
        let t = table(&["Name", "Street", "Phone"]);
        let s = resolve_schema(&t, "registry", true).unwrap();
        assert_eq!(s.address_cols.len(), 1);
        assert_eq!(s.address_cols[0].header, "Street");
    }

    #[test]
    fn pattern_fallback_is_case_insensitive() {
        let t = table(&["Donor Name", "MAILING ADDRESS", "Postal Code"]);
        let s = resolve_schema(&t, "registry", true).unwrap();
        assert_eq!(s.address_cols.len(), 2);
    }

    #[test]
    fn missing_addresses_fatal_only_when_required() {
        let t = table(&["Name", "Amount", "Memo"]);
        assert!(matches!(
            resolve_schema(&t, "registry", true),
            Err(SchemaError::AddressColumns { table: "registry" })
        ));
        let s = resolve_schema(&t, "source", false).unwrap();
        assert!(s.address_cols.is_empty());
    }

    #[test]
    fn name_column_candidates_take_priority() {
        let t = table(&["Customer/Grant: Company Name", "Nickname"]);
        let s = resolve_schema(&t, "source", false).unwrap();
        assert_eq!(s.name_col, 0);
    }

    #[test]
    fn name_fallback_scans_for_substring() {
        let t = table(&["Type", "Payer name", "Amount"]);
        let s = resolve_schema(&t, "source", false).unwrap();
        assert_eq!(s.name_col, 1);
    }

    #[test]
    fn missing_name_column_is_fatal() {
        let t = table(&["Type", "Date", "Amount"]);
        assert!(matches!(
            resolve_schema(&t, "source", false),
            Err(SchemaError::NameColumn { table: "source" })
        ));
    }
}
