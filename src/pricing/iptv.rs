//! IPTV subscription plans
//!
//! Prices come from a fixed table indexed by plan duration and number of
//! simultaneous devices. There is no formula behind the table.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

use super::{PricingError, round_div};

pub const IPTV_MAX_DEVICES: u32 = 5;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, AsRefStr,
)]
pub enum IptvPlan {
    #[serde(rename = "1mo")]
    #[strum(serialize = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    #[strum(serialize = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    #[strum(serialize = "6mo")]
    SixMonths,
    #[serde(rename = "1yr")]
    #[strum(serialize = "1yr")]
    OneYear,
}

/// 价格表（美分），按设备数 1..=5 排列
const PRICE_TABLE: [[i64; IPTV_MAX_DEVICES as usize]; 4] = [
    [1500, 2500, 3500, 4500, 5500],
    [3500, 5500, 7500, 9500, 11500],
    [5500, 8000, 10500, 13000, 15500],
    [8000, 11000, 14000, 17000, 20000],
];

impl IptvPlan {
    pub fn months(self) -> u32 {
        match self {
            Self::OneMonth => 1,
            Self::ThreeMonths => 3,
            Self::SixMonths => 6,
            Self::OneYear => 12,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OneMonth => "1 Month",
            Self::ThreeMonths => "3 Months",
            Self::SixMonths => "6 Months",
            Self::OneYear => "1 Year",
        }
    }

    fn row(self) -> usize {
        match self {
            Self::OneMonth => 0,
            Self::ThreeMonths => 1,
            Self::SixMonths => 2,
            Self::OneYear => 3,
        }
    }
}

impl std::fmt::Display for IptvPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for IptvPlan {
    type Err = PricingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1mo" | "1month" => Ok(Self::OneMonth),
            "3mo" | "3months" => Ok(Self::ThreeMonths),
            "6mo" | "6months" => Ok(Self::SixMonths),
            "1yr" | "1year" | "12mo" => Ok(Self::OneYear),
            _ => Err(PricingError::UnknownPlan(s.to_string())),
        }
    }
}

fn check_devices(devices: u32) -> Result<(), PricingError> {
    if devices == 0 || devices > IPTV_MAX_DEVICES {
        return Err(PricingError::InvalidDeviceCount {
            got: devices,
            max: IPTV_MAX_DEVICES,
        });
    }
    Ok(())
}

/// Table lookup for a plan and a device count.
pub fn iptv_price_cents(plan: IptvPlan, devices: u32) -> Result<i64, PricingError> {
    check_devices(devices)?;
    Ok(PRICE_TABLE[plan.row()][devices as usize - 1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IptvQuote {
    pub plan: IptvPlan,
    pub months: u32,
    pub devices: u32,
    pub total_cents: i64,
    pub per_device_cents: i64,
    /// Compared with buying `devices` single-device subscriptions
    pub savings_cents: i64,
}

pub fn quote_iptv(plan: IptvPlan, devices: u32) -> Result<IptvQuote, PricingError> {
    let total_cents = iptv_price_cents(plan, devices)?;
    let single = iptv_price_cents(plan, 1)?;

    Ok(IptvQuote {
        plan,
        months: plan.months(),
        devices,
        total_cents,
        per_device_cents: round_div(total_cents as i128, devices as i128),
        savings_cents: single * devices as i64 - total_cents,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IptvPriceRow {
    pub plan: IptvPlan,
    pub label: &'static str,
    pub months: u32,
    /// Index 0 is one device
    pub prices_cents: Vec<i64>,
}

/// The whole table, one row per plan in ascending duration
pub fn iptv_price_matrix() -> Vec<IptvPriceRow> {
    IptvPlan::iter()
        .map(|plan| IptvPriceRow {
            plan,
            label: plan.label(),
            months: plan.months(),
            prices_cents: PRICE_TABLE[plan.row()].to_vec(),
        })
        .collect()
}
