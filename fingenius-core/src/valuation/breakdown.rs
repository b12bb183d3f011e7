//! Live allocation breakdowns computed from holdings

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::portfolio::{Holding, Portfolio};
use crate::valuation::{market_value, percent_of, total_portfolio_value, CashPolicy};

pub const CASH_BUCKET: &str = "cash";
pub const UNCLASSIFIED_BUCKET: &str = "unclassified";

/// Attribute holdings are grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationDimension {
    SecurityType,
    Sector,
    Country,
}

impl AllocationDimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationDimension::SecurityType => "security_type",
            AllocationDimension::Sector => "sector",
            AllocationDimension::Country => "country",
        }
    }

    fn bucket_for<'a>(&self, holding: &'a Holding) -> &'a str {
        let key = match self {
            AllocationDimension::SecurityType => Some(holding.security_type.as_str()),
            AllocationDimension::Sector => holding.sector.as_deref(),
            AllocationDimension::Country => holding.country.as_deref(),
        };
        match key {
            Some(k) if !k.trim().is_empty() => k,
            _ => UNCLASSIFIED_BUCKET,
        }
    }
}

impl FromStr for AllocationDimension {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "security_type" => Ok(AllocationDimension::SecurityType),
            "sector" => Ok(AllocationDimension::Sector),
            "country" => Ok(AllocationDimension::Country),
            other => Err(format!(
                "unknown allocation dimension '{}', expected security_type, sector or country",
                other
            )),
        }
    }
}

impl fmt::Display for AllocationDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percentage of the live portfolio total per bucket of `dimension`.
///
/// Holdings with no value for the dimension land in `unclassified`; a
/// non-zero cash balance gets its own `cash` bucket. An empty map is returned
/// when the live total is zero.
pub fn allocation_breakdown(
    portfolio: &Portfolio,
    holdings: &[Holding],
    policy: &dyn CashPolicy,
    dimension: AllocationDimension,
) -> Result<BTreeMap<String, Decimal>> {
    let total = total_portfolio_value(portfolio, holdings, policy)?;
    if total.is_zero() {
        return Ok(BTreeMap::new());
    }

    let mut amounts: BTreeMap<String, Decimal> = BTreeMap::new();
    for holding in holdings {
        add_to_bucket(&mut amounts, dimension.bucket_for(holding), market_value(holding)?)?;
    }
    if !portfolio.cash_balance.is_zero() {
        add_to_bucket(&mut amounts, CASH_BUCKET, portfolio.cash_balance)?;
    }

    amounts
        .into_iter()
        .map(|(bucket, amount)| -> Result<(String, Decimal)> {
            Ok((bucket, percent_of(amount, total)?))
        })
        .collect()
}

fn add_to_bucket(amounts: &mut BTreeMap<String, Decimal>, bucket: &str, value: Decimal) -> Result<()> {
    let slot = amounts.entry(bucket.to_string()).or_insert(Decimal::ZERO);
    *slot = slot
        .checked_add(value)
        .ok_or_else(|| Error::InvalidState(format!("{bucket} bucket overflows")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::SecurityType;
    use crate::valuation::MarginAwareCashPolicy;
    use rust_decimal_macros::dec;

    fn priced(id: i64, security_type: SecurityType, sector: Option<&str>, value: Decimal) -> Holding {
        let mut h = Holding::new(id, 1, format!("SYM{}", id), "Security", security_type);
        h.quantity = Decimal::ONE;
        h.average_cost = value;
        h.current_price = Some(value);
        h.sector = sector.map(str::to_string);
        h
    }

    #[test]
    fn test_breakdown_by_security_type_includes_cash() {
        let mut portfolio = Portfolio::new(1, 1, "main");
        portfolio.cash_balance = dec!(2000);
        let holdings = vec![
            priced(1, SecurityType::Stock, Some("technology"), dec!(6000)),
            priced(2, SecurityType::Bond, None, dec!(2000)),
        ];

        let breakdown = allocation_breakdown(
            &portfolio,
            &holdings,
            &MarginAwareCashPolicy::default(),
            AllocationDimension::SecurityType,
        )
        .unwrap();

        assert_eq!(breakdown.get("stock"), Some(&dec!(60)));
        assert_eq!(breakdown.get("bond"), Some(&dec!(20)));
        assert_eq!(breakdown.get(CASH_BUCKET), Some(&dec!(20)));
    }

    #[test]
    fn test_breakdown_by_sector_unclassified() {
        let portfolio = Portfolio::new(1, 1, "main");
        let holdings = vec![
            priced(1, SecurityType::Stock, Some("technology"), dec!(50)),
            priced(2, SecurityType::Etf, Some("  "), dec!(50)),
        ];

        let breakdown = allocation_breakdown(
            &portfolio,
            &holdings,
            &MarginAwareCashPolicy::default(),
            AllocationDimension::Sector,
        )
        .unwrap();

        assert_eq!(breakdown.get("technology"), Some(&dec!(50)));
        assert_eq!(breakdown.get(UNCLASSIFIED_BUCKET), Some(&dec!(50)));
        assert!(breakdown.get(CASH_BUCKET).is_none());
    }

    #[test]
    fn test_breakdown_empty_when_total_zero() {
        let portfolio = Portfolio::new(1, 1, "empty");
        let breakdown = allocation_breakdown(
            &portfolio,
            &[],
            &MarginAwareCashPolicy::default(),
            AllocationDimension::Country,
        )
        .unwrap();
        assert!(breakdown.is_empty());
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(
            "security_type".parse::<AllocationDimension>().unwrap(),
            AllocationDimension::SecurityType
        );
        assert!("industry".parse::<AllocationDimension>().is_err());
    }
}
