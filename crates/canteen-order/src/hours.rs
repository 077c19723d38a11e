// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opening hours in the shop's local time.

use std::fmt;

use canteen_config::ShopConfig;
use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

/// A daily opening window that may run past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingHours {
    pub open_hour: u32,
    pub close_hour: u32,
    pub utc_offset_minutes: i32,
}

impl OperatingHours {
    pub fn from_config(shop: &ShopConfig) -> Self {
        Self {
            open_hour: shop.open_hour,
            close_hour: shop.close_hour,
            utc_offset_minutes: shop.utc_offset_minutes,
        }
    }

    /// The shop's UTC offset; out-of-range offsets fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset())
    }

    /// True when `instant` falls inside the window.
    ///
    /// `22 → 1` means open from 22:00 until 00:59 the next day. Equal open
    /// and close hours mean open around the clock.
    pub fn is_open_at(&self, instant: DateTime<Utc>) -> bool {
        let hour = self.local(instant).hour();
        match self.open_hour.cmp(&self.close_hour) {
            std::cmp::Ordering::Less => hour >= self.open_hour && hour < self.close_hour,
            std::cmp::Ordering::Greater => hour >= self.open_hour || hour < self.close_hour,
            std::cmp::Ordering::Equal => true,
        }
    }

    pub fn is_open_now(&self) -> bool {
        self.is_open_at(Utc::now())
    }

    /// Human-readable local time, as printed on orders and invoices.
    pub fn local_timestamp(&self, instant: DateTime<Utc>) -> String {
        self.local(instant).format("%d/%m/%Y, %I:%M:%S %p").to_string()
    }
}

impl fmt::Display for OperatingHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", twelve_hour(self.open_hour), twelve_hour(self.close_hour))
    }
}

fn twelve_hour(hour: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display} {suffix}")
}
