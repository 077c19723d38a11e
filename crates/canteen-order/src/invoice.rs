// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Printable HTML invoice for the last placed order.

use std::fmt::Write as _;

use canteen_config::ShopConfig;
use html_escape::encode_text;

use crate::checkout::PlacedOrder;
use crate::format_amount;
use crate::hours::OperatingHours;

const STYLE: &str = "\
body { font-family: Arial, sans-serif; padding: 20px; }
.header { text-align: center; border-bottom: 2px solid #333; padding-bottom: 10px; }
.order-details { margin: 20px 0; }
.items { margin: 20px 0; }
.item { display: flex; justify-content: space-between; margin: 5px 0; }
.total { font-weight: bold; border-top: 1px solid #333; padding-top: 10px; }
.footer { text-align: center; margin-top: 30px; }
@media print { body { margin: 0; } }";

/// Renders `order` as a standalone HTML page ready for printing.
///
/// Every piece of customer- or operator-supplied text is escaped.
pub fn render_invoice(order: &PlacedOrder, shop: &ShopConfig, hours: &OperatingHours) -> String {
    let shop_name = encode_text(&shop.name);
    let currency = encode_text(&shop.currency_symbol);

    let mut rows = String::new();
    for line in &order.items {
        // Writing into a String cannot fail.
        let _ = write!(
            rows,
            "\n      <div class=\"item\"><span>{} x {}</span><span>{}{}</span></div>",
            encode_text(&line.name),
            line.quantity,
            currency,
            format_amount(line.subtotal()),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{shop_name} - Invoice</title>
  <style>
{STYLE}
  </style>
</head>
<body>
  <div class="header">
    <h1>{shop_name}</h1>
    <p>Invoice - {timestamp}</p>
  </div>
  <div class="order-details">
    <p><strong>Customer:</strong> {name}</p>
    <p><strong>Room:</strong> {room}</p>
    <p><strong>Mobile:</strong> {mobile}</p>
  </div>
  <div class="items">
    <h3>Order Items:</h3>{rows}
  </div>
  <div class="total">
    <div class="item"><span>Total Amount:</span><span>{currency}{total}</span></div>
  </div>
  <div class="footer">
    <p>Thank you for ordering with {shop_name}!</p>
    <p>Open: {hours} | Contact: {contact}</p>
  </div>
</body>
</html>
"#,
        timestamp = encode_text(&order.timestamp),
        name = encode_text(&order.name),
        room = encode_text(&order.room),
        mobile = encode_text(&order.mobile),
        total = format_amount(order.total),
        contact = encode_text(&shop.contact),
    )
}
