//! Plain-text receipts for placed orders.

use std::fmt;

use crate::cart::LineItem;
use crate::checkout::Order;

const NAME_WIDTH: usize = 26;
const SIZE_WIDTH: usize = 8;
const QTY_WIDTH: usize = 4;
const AMOUNT_WIDTH: usize = 11;

/// Business details printed at the top and bottom of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptHeader {
    pub business_name: String,
    pub business_email: String,
}

impl ReceiptHeader {
    pub fn new(business_name: impl Into<String>, business_email: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            business_email: business_email.into(),
        }
    }
}

/// A receipt ready to print; render it with `to_string()` or `{}`.
pub struct Receipt<'a> {
    order: &'a Order,
    header: &'a ReceiptHeader,
}

impl Order {
    /// Receipt for this order under `header`.
    pub fn receipt<'a>(&'a self, header: &'a ReceiptHeader) -> Receipt<'a> {
        Receipt {
            order: self,
            header,
        }
    }
}

impl fmt::Display for Receipt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.order;
        let customer = &order.customer;

        writeln!(f, "{}", self.header.business_name)?;
        writeln!(f, "Email: {}", self.header.business_email)?;
        writeln!(f)?;
        writeln!(f, "RECEIPT")?;
        writeln!(f)?;
        writeln!(f, "Order Number: {}", order.order_number)?;
        writeln!(f, "Date:         {}", order.created_at.format("%B %d, %Y"))?;
        writeln!(f, "Customer:     {}", customer.name)?;
        writeln!(f, "Email:        {}", customer.email)?;
        writeln!(f)?;

        writeln!(f, "Shipping Address:")?;
        writeln!(f, "{}", customer.address.multi_line())?;
        writeln!(f)?;

        writeln!(f, "Items Ordered:")?;
        write_row(f, ["Item", "Size", "Qty", "Price", "Total"])?;
        for item in &order.items {
            write_item(f, item)?;
        }
        writeln!(f)?;

        let totals = &order.totals;
        write_total(f, "Subtotal:", &totals.subtotal.display())?;
        write_total(f, "Shipping:", &totals.shipping.display())?;
        write_total(f, "Tax:", &totals.tax.display())?;
        write_total(f, "TOTAL:", &totals.total.display())?;
        writeln!(f)?;

        writeln!(f, "Thank you for your purchase!")?;
        writeln!(f, "Each bikini is handcrafted with love.")?;
        write!(f, "Questions? Contact us at {}", self.header.business_email)
    }
}

fn write_item(f: &mut fmt::Formatter<'_>, item: &LineItem) -> fmt::Result {
    let name: String = item.name.chars().take(NAME_WIDTH).collect();
    write_row(
        f,
        [
            &name,
            &item.size,
            &item.quantity.to_string(),
            &item.price.display(),
            &item.line_total().display(),
        ],
    )
}

fn write_row(f: &mut fmt::Formatter<'_>, cols: [&str; 5]) -> fmt::Result {
    writeln!(
        f,
        "{:<nw$} {:<sw$} {:>qw$} {:>aw$} {:>aw$}",
        cols[0],
        cols[1],
        cols[2],
        cols[3],
        cols[4],
        nw = NAME_WIDTH,
        sw = SIZE_WIDTH,
        qw = QTY_WIDTH,
        aw = AMOUNT_WIDTH,
    )
}

fn write_total(f: &mut fmt::Formatter<'_>, label: &str, amount: &str) -> fmt::Result {
    let label_width = NAME_WIDTH + SIZE_WIDTH + QTY_WIDTH + AMOUNT_WIDTH + 3;
    writeln!(f, "{:>lw$} {:>aw$}", label, amount, lw = label_width, aw = AMOUNT_WIDTH)
}
