//! Totals report for one transaction.

use inandout_core::{ItemTransaction, PriceType, RoundingRuleSet, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

// =============================================================================
// Report Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineReport {
    pub item_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    pub price_type: PriceType,
    pub quantity: u32,
    pub total_before_tax: Decimal,
    pub price_per_unit_before_tax: Decimal,
    pub tax: Decimal,
    pub total_after_tax: Decimal,
    pub price_per_unit_after_tax: Decimal,
    /// Per-unit figures are averages of a sum.
    pub average_price_only: bool,
    /// Before-tax figures were backed out of a taxed price.
    pub price_before_tax_inferred: bool,
}

impl LineReport {
    fn build(line: &ItemTransaction, rules: &RoundingRuleSet) -> Self {
        let info = &line.price_info;
        LineReport {
            item_name: line.item_name.clone(),
            item_id: line.item_id.clone(),
            variant: line.variant.clone(),
            price_type: info.price_type,
            quantity: info.quantity,
            total_before_tax: info.total_before_tax(),
            price_per_unit_before_tax: info.price_per_unit_before_tax(),
            tax: info.all_tax_sum(rules.tax_item),
            total_after_tax: line.total_after_tax(rules),
            price_per_unit_after_tax: info
                .price_per_unit_after_tax(rules.tax_item, rules.item_total),
            average_price_only: info.can_only_calculate_average_price(),
            price_before_tax_inferred: info.can_only_infer_price_before_tax(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    Regular,
    Compound,
    Fixed,
}

/// One row of the shared tax breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedTaxRow {
    pub name: String,
    pub kind: TaxKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsReport {
    pub transaction_type: String,
    pub transaction_id: String,
    pub lines: Vec<LineReport>,
    pub subtotal: Decimal,
    pub fixed_costs: Decimal,
    pub total: Decimal,
    /// Absent when lines carry different tax items.
    pub shared_taxes: Option<Vec<SharedTaxRow>>,
}

// =============================================================================
// Building
// =============================================================================

impl TotalsReport {
    pub fn build(txn: &Transaction, rules: &RoundingRuleSet) -> Self {
        let shared_taxes = txn.shared_tax_info(rules.tax_item).map(|shared| {
            let mut rows: Vec<SharedTaxRow> = shared
                .regular
                .into_iter()
                .map(|(item, total)| SharedTaxRow {
                    name: item.name,
                    kind: TaxKind::Regular,
                    rate: Some(item.rate),
                    amount: None,
                    total,
                })
                .chain(shared.compound.into_iter().map(|(item, total)| SharedTaxRow {
                    name: item.name,
                    kind: TaxKind::Compound,
                    rate: Some(item.rate),
                    amount: None,
                    total,
                }))
                .chain(shared.fixed.into_iter().map(|(item, total)| SharedTaxRow {
                    name: item.name,
                    kind: TaxKind::Fixed,
                    rate: None,
                    amount: Some(item.amount),
                    total,
                }))
                .collect();
            // HashMap order is unstable
            rows.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
            rows
        });

        TotalsReport {
            transaction_type: txn.transaction_type.to_string(),
            transaction_id: txn.transaction_id.clone(),
            lines: txn
                .subtransactions
                .iter()
                .map(|line| LineReport::build(line, rules))
                .collect(),
            subtotal: txn.subtotal(),
            fixed_costs: txn.fixed_cost_sum(),
            total: txn.total(rules),
            shared_taxes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inandout_core::{FixedAmountItem, PriceInfo, RateTaxItem, RoundingRule, TransactionType};
    use rust_decimal_macros::dec;

    fn rules() -> RoundingRuleSet {
        RoundingRuleSet::uniform(RoundingRule::half_up(2))
    }

    fn taxed_line(name: &str, price: Decimal) -> ItemTransaction {
        ItemTransaction::new(
            name,
            PriceInfo::new(price, PriceType::SumBeforeTax, 2)
                .with_regular_tax(RateTaxItem::new("GST", dec!(0.05)))
                .with_compound_tax(RateTaxItem::new("QST", dec!(0.10)))
                .with_fixed_tax(FixedAmountItem::new("Eco Fee", dec!(1.00))),
        )
    }

    #[test]
    fn test_report_totals() {
        let txn = Transaction::fresh(TransactionType::ItemsOut)
            .with_subtransactions(vec![taxed_line("Widget", dec!(100)), taxed_line("Gadget", dec!(50))])
            .with_fixed_costs(vec![FixedAmountItem::new("Shipping", dec!(5))]);

        let report = TotalsReport::build(&txn, &rules());

        assert_eq!(report.transaction_type, "Items Out");
        assert_eq!(report.subtotal, dec!(150));
        assert_eq!(report.fixed_costs, dec!(5));
        // 116.50 + 58.75 + 5
        assert_eq!(report.lines[0].total_after_tax, dec!(116.50));
        assert_eq!(report.lines[1].total_after_tax, dec!(58.75));
        assert_eq!(report.total, dec!(180.25));
        assert!(report.lines[0].average_price_only);
        assert!(!report.lines[0].price_before_tax_inferred);
        assert_eq!(report.lines[0].price_per_unit_after_tax, dec!(58.25));
    }

    #[test]
    fn test_shared_tax_rows_sorted() {
        let txn = Transaction::fresh(TransactionType::ItemsIn)
            .with_subtransactions(vec![taxed_line("Widget", dec!(100)), taxed_line("Gadget", dec!(50))]);

        let rows = TotalsReport::build(&txn, &rules()).shared_taxes.unwrap();
        let summary: Vec<(&str, TaxKind, Decimal)> = rows
            .iter()
            .map(|row| (row.name.as_str(), row.kind, row.total))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("GST", TaxKind::Regular, dec!(7.50)),
                ("QST", TaxKind::Compound, dec!(15.75)),
                ("Eco Fee", TaxKind::Fixed, dec!(2.00)),
            ]
        );
        assert_eq!(rows[0].rate, Some(dec!(0.05)));
        assert_eq!(rows[2].amount, Some(dec!(1.00)));
    }

    #[test]
    fn test_mixed_taxes_have_no_shared_rows() {
        let plain = ItemTransaction::new(
            "Untaxed",
            PriceInfo::new(dec!(10), PriceType::PerUnitBeforeTax, 1),
        );
        let txn = Transaction::fresh(TransactionType::ItemsIn)
            .with_subtransactions(vec![taxed_line("Widget", dec!(100)), plain]);

        let report = TotalsReport::build(&txn, &rules());
        assert!(report.shared_taxes.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["shared_taxes"].is_null());
        assert_eq!(json["lines"][1]["price_type"], "per_unit_before_tax");
    }

    #[test]
    fn test_empty_transaction() {
        let report = TotalsReport::build(&Transaction::fresh(TransactionType::ItemsIn), &rules());
        assert!(report.lines.is_empty());
        assert_eq!(report.total, Decimal::ZERO);
        assert!(report.shared_taxes.is_none());
    }

    #[test]
    fn test_demo_purchase() {
        let txn: Transaction =
            serde_json::from_str(include_str!("../demos/purchase.json")).unwrap();
        txn.validate(true).unwrap();
        txn.validate_totals(&rules()).unwrap();

        let report = TotalsReport::build(&txn, &rules());
        // Widget: 100 + 5.00 GST + 10.47 QST on 105.00
        assert_eq!(report.lines[0].total_after_tax, dec!(115.47));
        // Gadget: 37.47 + 1.87 GST + 3.92 QST
        assert_eq!(report.lines[1].total_after_tax, dec!(43.26));
        assert_eq!(report.total, dec!(166.23));
        assert_eq!(report.shared_taxes.unwrap().len(), 2);
    }
}
