// 料金表の月額 / 年額切り替え

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Yearly,
}

/// 各価格グループに設定する display の値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceDisplay {
    pub monthly: &'static str,
    pub yearly: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct PricingToggle {
    period: BillingPeriod,
}

impl PricingToggle {
    pub fn new(period: BillingPeriod) -> Self {
        Self { period }
    }

    pub fn period(&self) -> BillingPeriod {
        self.period
    }

    pub fn select(&mut self, period: BillingPeriod) -> PriceDisplay {
        self.period = period;
        self.display()
    }

    /// ラジオボタンの change。期間が変わった時だけ表示を返す
    pub fn radio_changed(&mut self, monthly_checked: bool) -> Option<PriceDisplay> {
        let period = if monthly_checked {
            BillingPeriod::Monthly
        } else {
            BillingPeriod::Yearly
        };
        if period == self.period {
            return None;
        }
        Some(self.select(period))
    }

    pub fn display(&self) -> PriceDisplay {
        match self.period {
            BillingPeriod::Monthly => PriceDisplay {
                monthly: "block",
                yearly: "none",
            },
            BillingPeriod::Yearly => PriceDisplay {
                monthly: "none",
                yearly: "block",
            },
        }
    }
}
