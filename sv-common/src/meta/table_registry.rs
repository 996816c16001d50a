use crate::meta::{
    foreign_key::{ForeignKey, RefAction},
    table_desc::TableDesc,
};

/// The tables covered by backup/restore, with their declared foreign keys.
///
/// Declaration order is the hand-verified manual insert order and serves as
/// the tie-break when the dependency order is resolved. A new table must be
/// declared after every table it references. Edges to tables outside this
/// set (e.g. `Order.storeId`) are not declared here.
pub fn ecommerce_tables() -> Vec<TableDesc> {
    use RefAction::*;

    vec![
        TableDesc::new("User", "users", vec![]),
        TableDesc::new(
            "Category",
            "categories",
            // the one known self reference: the category hierarchy
            vec![ForeignKey::new("parentId", "Category", "id", Cascade, SetNull)],
        ),
        TableDesc::new("Manufacturer", "manufacturers", vec![]),
        TableDesc::new(
            "Product",
            "products",
            vec![
                ForeignKey::new("categoryId", "Category", "id", Cascade, Restrict),
                ForeignKey::new("manufacturerId", "Manufacturer", "id", Cascade, Restrict),
            ],
        ),
        TableDesc::new(
            "ProductVariant",
            "productVariants",
            vec![ForeignKey::new("productId", "Product", "id", Cascade, Cascade)],
        ),
        TableDesc::new(
            "Address",
            "addresses",
            vec![ForeignKey::new("userId", "User", "id", Cascade, Cascade)],
        ),
        TableDesc::new(
            "PaymentMethod",
            "paymentMethods",
            vec![ForeignKey::new("userId", "User", "id", Cascade, Cascade)],
        ),
        TableDesc::new(
            "Order",
            "orders",
            vec![
                ForeignKey::new("userId", "User", "id", Cascade, Cascade),
                ForeignKey::new("shippingAddressId", "Address", "id", Cascade, Restrict),
                ForeignKey::new("billingAddressId", "Address", "id", Cascade, Restrict),
                ForeignKey::new("paymentMethodId", "PaymentMethod", "id", NoAction, NoAction),
            ],
        ),
        TableDesc::new(
            "OrderDetails",
            "orderDetails",
            vec![
                ForeignKey::new("orderId", "Order", "id", Cascade, Cascade),
                ForeignKey::new("productVariantId", "ProductVariant", "id", Cascade, Cascade),
            ],
        ),
        TableDesc::new(
            "Review",
            "reviews",
            vec![
                ForeignKey::new("userId", "User", "id", Cascade, Cascade),
                ForeignKey::new("productId", "Product", "id", Cascade, Cascade),
            ],
        ),
        TableDesc::new(
            "Cart",
            "carts",
            vec![
                ForeignKey::new("userId", "User", "id", NoAction, Cascade),
                ForeignKey::new("productId", "Product", "id", NoAction, Cascade),
                ForeignKey::new("productVariantId", "ProductVariant", "id", NoAction, Cascade),
            ],
        ),
        TableDesc::new(
            "InventoryManagement",
            "inventoryManagement",
            vec![
                ForeignKey::new("productVariantId", "ProductVariant", "id", Cascade, Restrict),
                ForeignKey::new("orderId", "Order", "id", Cascade, SetNull),
                ForeignKey::new("createdBy", "User", "id", Cascade, Restrict),
            ],
        ),
        TableDesc::new(
            "Account",
            "accounts",
            vec![ForeignKey::new("userId", "User", "id", Cascade, Cascade)],
        ),
        TableDesc::new("VerificationToken", "verificationTokens", vec![]),
        TableDesc::new("PasswordResetToken", "passwordResetTokens", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_aliases_and_names_are_unique() {
        let tables = ecommerce_tables();
        let names: HashSet<&str> = tables.iter().map(|t| t.tb.as_str()).collect();
        let aliases: HashSet<&str> = tables.iter().map(|t| t.alias.as_str()).collect();
        assert_eq!(names.len(), tables.len());
        assert_eq!(aliases.len(), tables.len());
    }

    #[test]
    fn test_declaration_order_is_a_valid_insert_order() {
        // the manual invariant: a table never precedes a table it references
        let tables = ecommerce_tables();
        for (i, table) in tables.iter().enumerate() {
            for ref_tb in table.referenced_tbs() {
                let ref_pos = tables
                    .iter()
                    .position(|t| t.tb == ref_tb)
                    .unwrap_or_else(|| panic!("{} references unknown table {}", table.tb, ref_tb));
                assert!(
                    ref_pos < i,
                    "{} is declared before its dependency {}",
                    table.tb,
                    ref_tb
                );
            }
        }
    }

    #[test]
    fn test_only_category_references_itself() {
        for table in ecommerce_tables() {
            let self_refs = table
                .foreign_keys
                .iter()
                .filter(|fk| fk.is_self_reference(&table.tb))
                .count();
            if table.tb == "Category" {
                assert_eq!(self_refs, 1);
            } else {
                assert_eq!(self_refs, 0);
            }
        }
    }
}
