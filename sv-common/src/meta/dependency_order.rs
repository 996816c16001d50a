use std::collections::{HashMap, HashSet};

use anyhow::bail;

use crate::error::Error;
use crate::meta::table_desc::TableDesc;

/// Resolve the order tables must be inserted in: every table comes after all
/// tables it references via foreign keys (Kahn's algorithm).
///
/// Ties are broken by declaration order, so the result is deterministic and
/// matches the hand-verified manual order whenever that order is already
/// topological. Self references are ignored. Edges to tables outside the
/// given set are ignored. Any remaining cycle is an error.
pub fn resolve_insert_order(tables: &[TableDesc]) -> anyhow::Result<Vec<TableDesc>> {
    let mut index_of: HashMap<&str, usize> = HashMap::new();
    for (i, table) in tables.iter().enumerate() {
        if index_of.insert(table.tb.as_str(), i).is_some() {
            bail! {Error::MetadataError(format!(
                "table {} is registered more than once",
                table.tb
            ))}
        }
    }

    let mut in_degree = vec![0usize; tables.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); tables.len()];
    for (i, table) in tables.iter().enumerate() {
        // count each referenced table once, even when several columns
        // point at it (e.g. shipping and billing addresses)
        let mut counted: HashSet<usize> = HashSet::new();
        for ref_tb in table.referenced_tbs() {
            if let Some(&j) = index_of.get(ref_tb) {
                if counted.insert(j) {
                    in_degree[i] += 1;
                    dependents[j].push(i);
                }
            }
        }
    }

    let mut resolved: Vec<usize> = Vec::with_capacity(tables.len());
    let mut done = vec![false; tables.len()];
    loop {
        // lowest declaration index among the ready tables
        let mut next: Option<usize> = None;
        for i in 0..tables.len() {
            if !done[i] && in_degree[i] == 0 {
                next = Some(i);
                break;
            }
        }

        let Some(i) = next else {
            break;
        };
        done[i] = true;
        resolved.push(i);
        for &dependent in dependents[i].iter() {
            in_degree[dependent] -= 1;
        }
    }

    if resolved.len() != tables.len() {
        let remaining: Vec<&str> = tables
            .iter()
            .enumerate()
            .filter(|(i, _)| !done[*i])
            .map(|(_, t)| t.tb.as_str())
            .collect();
        bail! {Error::MetadataError(format!(
            "foreign key cycle among tables: [{}]",
            remaining.join(", ")
        ))}
    }

    Ok(resolved.iter().map(|&i| tables[i].clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{
        foreign_key::{ForeignKey, RefAction},
        table_registry::ecommerce_tables,
    };

    fn fk(col: &str, ref_tb: &str) -> ForeignKey {
        ForeignKey::new(col, ref_tb, "id", RefAction::Cascade, RefAction::Cascade)
    }

    #[test]
    fn test_order_invariant_holds_for_registry() {
        let order = resolve_insert_order(&ecommerce_tables()).unwrap();
        for (i, table) in order.iter().enumerate() {
            for ref_tb in table.referenced_tbs() {
                let ref_pos = order.iter().position(|t| t.tb == ref_tb).unwrap();
                assert!(
                    ref_pos < i,
                    "{} must be inserted after {}",
                    table.tb,
                    ref_tb
                );
            }
        }
    }

    #[test]
    fn test_registry_resolves_to_manual_order() {
        // the declared order is already topological, so tie-breaking must
        // reproduce it exactly
        let tables = ecommerce_tables();
        let declared: Vec<String> = tables.iter().map(|t| t.tb.clone()).collect();
        let resolved: Vec<String> = resolve_insert_order(&tables)
            .unwrap()
            .iter()
            .map(|t| t.tb.clone())
            .collect();
        assert_eq!(declared, resolved);
    }

    #[test]
    fn test_dependency_declared_out_of_order_is_reordered() {
        let tables = vec![
            TableDesc::new("OrderLine", "orderLines", vec![fk("orderId", "Order")]),
            TableDesc::new("Order", "orders", vec![]),
        ];
        let resolved = resolve_insert_order(&tables).unwrap();
        assert_eq!(resolved[0].tb, "Order");
        assert_eq!(resolved[1].tb, "OrderLine");
    }

    #[test]
    fn test_self_reference_is_ignored() {
        let tables = vec![TableDesc::new(
            "Category",
            "categories",
            vec![fk("parentId", "Category")],
        )];
        let resolved = resolve_insert_order(&tables).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_edge_to_unregistered_table_is_ignored() {
        let tables = vec![TableDesc::new(
            "Order",
            "orders",
            vec![fk("storeId", "Store")],
        )];
        let resolved = resolve_insert_order(&tables).unwrap();
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_true_cycle_is_rejected() {
        let tables = vec![
            TableDesc::new("A", "as", vec![fk("bId", "B")]),
            TableDesc::new("B", "bs", vec![fk("aId", "A")]),
        ];
        let err = resolve_insert_order(&tables).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let tables = vec![
            TableDesc::new("A", "as", vec![]),
            TableDesc::new("A", "as2", vec![]),
        ];
        assert!(resolve_insert_order(&tables).is_err());
    }
}
