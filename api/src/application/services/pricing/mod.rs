use std::ops::RangeInclusive;

use crate::domain::applications::application::ApplicantType;

/// Upper bound on lines carried by a single application.
pub const MAX_LINES_PER_APPLICATION: i32 = 9_999;

/// Lines an applicant may request through the sign-up form.
pub fn form_line_limit(applicant_type: ApplicantType) -> i32 {
    match applicant_type {
        ApplicantType::Individual => 5,
        ApplicantType::Corporate => 999,
    }
}

/// Three-month plans available for repeat orders from the customer portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPlan {
    ThreeMonth50Plus,
    ThreeMonthUnder50,
}

impl OrderPlan {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "3month-50plus" => Some(OrderPlan::ThreeMonth50Plus),
            "3month-under50" => Some(OrderPlan::ThreeMonthUnder50),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPlan::ThreeMonth50Plus => "3month-50plus",
            OrderPlan::ThreeMonthUnder50 => "3month-under50",
        }
    }

    /// Yen, tax included.
    pub fn price_per_line(&self) -> i64 {
        match self {
            OrderPlan::ThreeMonth50Plus => 4_200,
            OrderPlan::ThreeMonthUnder50 => 4_600,
        }
    }

    pub fn allowed_line_counts(&self) -> RangeInclusive<i32> {
        match self {
            OrderPlan::ThreeMonth50Plus => 50..=MAX_LINES_PER_APPLICATION,
            OrderPlan::ThreeMonthUnder50 => 1..=49,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub plan: OrderPlan,
    pub line_count: i32,
    pub total_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("unknown plan: {0}")]
    UnknownPlan(String),
    #[error("line count {count} is not allowed for plan {plan}")]
    LineCount { plan: &'static str, count: i32 },
}

pub fn quote(plan: &str, line_count: i32) -> Result<Quote, QuoteError> {
    let plan = OrderPlan::parse(plan).ok_or_else(|| QuoteError::UnknownPlan(plan.to_string()))?;
    if !plan.allowed_line_counts().contains(&line_count) {
        return Err(QuoteError::LineCount {
            plan: plan.as_str(),
            count: line_count,
        });
    }
    Ok(Quote {
        plan,
        line_count,
        total_amount: plan.price_per_line() * i64::from(line_count),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_bulk_plan() {
        let q = quote("3month-50plus", 50).unwrap();
        assert_eq!(q.total_amount, 210_000);
    }

    #[test]
    fn prices_small_plan() {
        let q = quote("3month-under50", 3).unwrap();
        assert_eq!(q.total_amount, 13_800);
    }

    #[test]
    fn enforces_plan_boundaries() {
        assert!(matches!(
            quote("3month-50plus", 49),
            Err(QuoteError::LineCount { count: 49, .. })
        ));
        assert!(quote("3month-under50", 50).is_err());
        assert!(quote("3month-under50", 0).is_err());
        assert!(quote("3month-50plus", MAX_LINES_PER_APPLICATION).is_ok());
        assert!(quote("3month-50plus", MAX_LINES_PER_APPLICATION + 1).is_err());
    }

    #[test]
    fn form_limit_depends_on_applicant_type() {
        assert_eq!(form_line_limit(ApplicantType::Individual), 5);
        assert_eq!(form_line_limit(ApplicantType::Corporate), 999);
    }

    #[test]
    fn rejects_unknown_plan() {
        assert_eq!(
            quote("6month", 10),
            Err(QuoteError::UnknownPlan("6month".into()))
        );
    }
}
