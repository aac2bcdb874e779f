//! Business category and payment type assignment.
//!
//! Two ordered rule tables with different precedence:
//! [`BUSINESS_RULES`] is first-match, [`PAYMENT_RULES`] is last-match (a
//! later rule overrides every earlier one that also applied).

use std::collections::BTreeMap;

use ilims_model::{
    AccessionStatus, Assignment, BusinessCategory, ClassificationRules, ClassifiedOrder,
    OrderRecord, PaymentType,
};
use tracing::{debug, warn};

use crate::datetime::parse_day_first;
use crate::text_utils::{contains_ignore_case, normalize_label};

type Predicate = fn(&OrderRecord, &ClassificationRules) -> bool;

const FOC: &str = "FOC";

#[derive(Debug, Clone, Copy)]
pub struct BusinessRule {
    pub name: &'static str,
    pub category: BusinessCategory,
    applies: Predicate,
}

impl BusinessRule {
    pub fn applies(&self, order: &OrderRecord, rules: &ClassificationRules) -> bool {
        (self.applies)(order, rules)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PaymentRule {
    pub name: &'static str,
    pub payment_type: PaymentType,
    applies: Predicate,
}

impl PaymentRule {
    pub fn applies(&self, order: &OrderRecord, rules: &ClassificationRules) -> bool {
        (self.applies)(order, rules)
    }
}

/// Evaluated top to bottom; the first rule that applies decides.
/// Orders matching none fall back to [`BusinessCategory::NonService`].
pub const BUSINESS_RULES: &[BusinessRule] = &[
    BusinessRule {
        name: "international country",
        category: BusinessCategory::International,
        applies: |order, rules| rules.is_international(&order.country),
    },
    BusinessRule {
        name: "excluded facility",
        category: BusinessCategory::NonService,
        applies: |order, rules| rules.is_excluded_facility(&order.facility_name),
    },
    BusinessRule {
        name: "bot account",
        category: BusinessCategory::NonService,
        applies: |order, rules| rules.is_bot(&order.order_created_by),
    },
    BusinessRule {
        name: "FOC by authorized staff",
        category: BusinessCategory::NonService,
        applies: |order, rules| {
            is_foc_payment(order) && rules.is_foc_authorized(&order.order_created_by)
        },
    },
    BusinessRule {
        name: "FOC by other staff",
        category: BusinessCategory::ServiceFoc,
        applies: |order, rules| {
            is_foc_payment(order)
                && !rules.is_foc_authorized(&order.order_created_by)
                && !rules.is_bot(&order.order_created_by)
        },
    },
    BusinessRule {
        name: "service sample",
        category: BusinessCategory::Service,
        applies: |order, _| contains_ignore_case(&order.sample_category, "Service"),
    },
];

const DEFAULT_BUSINESS: BusinessCategory = BusinessCategory::NonService;

/// Evaluated top to bottom; the last rule that applies decides.
/// Orders matching none are [`PaymentType::Unassigned`].
pub const PAYMENT_RULES: &[PaymentRule] = &[
    PaymentRule {
        name: "order type MOU",
        payment_type: PaymentType::B2b,
        applies: |order, _| order.order_type == "MOU",
    },
    PaymentRule {
        name: "order type Retail",
        payment_type: PaymentType::B2c,
        applies: |order, _| order.order_type == "Retail",
    },
    PaymentRule {
        name: "order type FOC",
        payment_type: PaymentType::Foc,
        applies: |order, _| order.order_type == FOC,
    },
    PaymentRule {
        name: "payment status FOC",
        payment_type: PaymentType::Foc,
        applies: |order, _| is_foc_payment(order),
    },
    PaymentRule {
        name: "research order",
        payment_type: PaymentType::Other,
        applies: |order, _| order.order_type.contains("Research"),
    },
];

fn is_foc_payment(order: &OrderRecord) -> bool {
    order.payment_status == FOC
}

/// Outcome of classifying one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub business: BusinessCategory,
    pub payment_type: PaymentType,
}

pub fn business_category(order: &OrderRecord, rules: &ClassificationRules) -> BusinessCategory {
    BUSINESS_RULES
        .iter()
        .find(|rule| rule.applies(order, rules))
        .map_or(DEFAULT_BUSINESS, |rule| rule.category)
}

pub fn payment_type(order: &OrderRecord, rules: &ClassificationRules) -> PaymentType {
    PAYMENT_RULES
        .iter()
        .rev()
        .find(|rule| rule.applies(order, rules))
        .map_or(PaymentType::Unassigned, |rule| rule.payment_type)
}

pub fn classify(order: &OrderRecord, rules: &ClassificationRules) -> Classification {
    Classification {
        business: business_category(order, rules),
        payment_type: payment_type(order, rules),
    }
}

/// Classify every order and derive its parsed dates and normalized labels.
///
/// Lookup columns start empty; [`crate::enrich::Enricher`] fills them.
pub fn classify_orders(orders: &[OrderRecord], rules: &ClassificationRules) -> Vec<ClassifiedOrder> {
    let mut business_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut payment_counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut unparsed_order_dates = 0usize;

    let classified: Vec<ClassifiedOrder> = orders
        .iter()
        .map(|order| {
            let Classification {
                business,
                payment_type,
            } = classify(order, rules);
            *business_counts.entry(business.as_str()).or_default() += 1;
            *payment_counts.entry(payment_type.as_str()).or_default() += 1;

            let order_date = parse_day_first(&order.order_created_date);
            if order_date.is_none() {
                unparsed_order_dates += 1;
            }
            ClassifiedOrder {
                business,
                business_normalized: normalize_label(business.as_str()),
                payment_type,
                assignment: Assignment::default(),
                order_date,
                accession_date: parse_day_first(&order.accession_timestamp),
                collection_date: parse_day_first(&order.sample_collection_timestamp),
                accession_status: AccessionStatus::from_normalized(&normalize_label(
                    &order.accession_status,
                )),
                final_date: None,
                order: order.clone(),
            }
        })
        .collect();

    for (category, count) in &business_counts {
        debug!(category, count, "business category assigned");
    }
    for (payment_type, count) in &payment_counts {
        debug!(payment_type, count, "payment type assigned");
    }
    if unparsed_order_dates > 0 {
        warn!(
            count = unparsed_order_dates,
            "order created dates could not be parsed; rows excluded from dated cohorts"
        );
    }
    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> OrderRecord {
        OrderRecord {
            country: "India".to_string(),
            sample_category: "Routine".to_string(),
            order_created_by: "field.rep@onecelldx.com".to_string(),
            ..OrderRecord::default()
        }
    }

    #[test]
    fn country_rule_beats_sample_category() {
        let rules = ClassificationRules::default();
        let record = OrderRecord {
            country: "Egypt".to_string(),
            sample_category: "Home Service".to_string(),
            payment_status: "Paid".to_string(),
            ..order()
        };
        assert_eq!(
            business_category(&record, &rules),
            BusinessCategory::International
        );
    }

    #[test]
    fn routine_sample_defaults_to_non_service() {
        let rules = ClassificationRules::default();
        assert_eq!(
            business_category(&order(), &rules),
            BusinessCategory::NonService
        );
    }

    #[test]
    fn service_match_is_case_insensitive() {
        let rules = ClassificationRules::default();
        let record = OrderRecord {
            sample_category: "home SERVICE".to_string(),
            ..order()
        };
        assert_eq!(business_category(&record, &rules), BusinessCategory::Service);
    }

    #[test]
    fn foc_split_depends_on_creator() {
        let rules = ClassificationRules::default();
        let authorized = OrderRecord {
            payment_status: "FOC".to_string(),
            order_created_by: "priti.thate@onecelldx.com".to_string(),
            sample_category: "Service".to_string(),
            ..order()
        };
        assert_eq!(
            business_category(&authorized, &rules),
            BusinessCategory::NonService
        );

        let other = OrderRecord {
            order_created_by: "someone@onecelldx.com".to_string(),
            ..authorized.clone()
        };
        assert_eq!(business_category(&other, &rules), BusinessCategory::ServiceFoc);

        let bot = OrderRecord {
            order_created_by: "indx2.bot@indx.ai".to_string(),
            ..authorized
        };
        assert_eq!(business_category(&bot, &rules), BusinessCategory::NonService);
    }

    #[test]
    fn excluded_facility_is_non_service() {
        let rules = ClassificationRules::default();
        let record = OrderRecord {
            facility_name: "Cancer institute W.I.A".to_string(),
            sample_category: "Service".to_string(),
            ..order()
        };
        assert_eq!(
            business_category(&record, &rules),
            BusinessCategory::NonService
        );
    }

    #[test]
    fn payment_status_overrides_order_type() {
        let rules = ClassificationRules::default();
        let record = OrderRecord {
            order_type: "MOU".to_string(),
            payment_status: "FOC".to_string(),
            ..order()
        };
        assert_eq!(payment_type(&record, &rules), PaymentType::Foc);
    }

    #[test]
    fn research_overrides_everything() {
        let rules = ClassificationRules::default();
        let record = OrderRecord {
            order_type: "Research MOU".to_string(),
            payment_status: "FOC".to_string(),
            ..order()
        };
        assert_eq!(payment_type(&record, &rules), PaymentType::Other);

        let research_foc = OrderRecord {
            order_type: "Research".to_string(),
            payment_status: "FOC".to_string(),
            ..order()
        };
        assert_eq!(payment_type(&research_foc, &rules), PaymentType::Other);

        let lower = OrderRecord {
            order_type: "research".to_string(),
            ..order()
        };
        assert_eq!(payment_type(&lower, &rules), PaymentType::Unassigned);
    }

    #[test]
    fn plain_order_types_map_directly() {
        let rules = ClassificationRules::default();
        for (order_type, expected) in [
            ("MOU", PaymentType::B2b),
            ("Retail", PaymentType::B2c),
            ("FOC", PaymentType::Foc),
            ("Walk-in", PaymentType::Unassigned),
        ] {
            let record = OrderRecord {
                order_type: order_type.to_string(),
                ..order()
            };
            assert_eq!(payment_type(&record, &rules), expected, "{order_type}");
        }
    }

    #[test]
    fn classify_orders_normalizes_labels_and_dates() {
        let rules = ClassificationRules::default();
        let record = OrderRecord {
            sample_category: "Service".to_string(),
            accession_status: " problem case ".to_string(),
            order_created_date: "03-12-2025 10:15".to_string(),
            accession_timestamp: "not yet".to_string(),
            ..order()
        };
        let classified = classify_orders(&[record], &rules);
        assert_eq!(classified.len(), 1);
        let row = &classified[0];
        assert_eq!(row.business_normalized, "Service");
        assert_eq!(row.accession_status, AccessionStatus::ProblemCase);
        assert!(row.order_date.is_some());
        assert!(row.accession_date.is_none());
        assert!(row.assignment.is_empty());
    }
}
