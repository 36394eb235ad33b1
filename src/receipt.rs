//! Receipt
//!
//! Renders a cart as a fixed-width table: three 17 character cells framed by
//! `|`, with `+---+` borders above and below.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Padding, Style, Theme, Width,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartEngine,
    items::{Cart, LineItem},
    tax::TaxError,
};

/// Content width of a single cell, excluding its padding.
pub const CELL_WIDTH: usize = 15;

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line item could not be priced or taxed
    #[error(transparent)]
    Pricing(#[from] TaxError),

    /// IO error
    #[error("failed to write receipt")]
    Io(#[from] io::Error),
}

/// One item row of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    name: String,
    unit_price: Decimal,
    quantity: u32,
}

impl ReceiptLine {
    /// Creates a row. The name is shown exactly as given.
    pub fn new(name: impl Into<String>, unit_price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Display name of the product
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price shown in the `price` column
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Units purchased
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    fn from_item(engine: &CartEngine<'_>, item: &LineItem) -> Self {
        Self::new(
            titleize(item.product_name()),
            engine.unit_price(item).unwrap_or(Decimal::ZERO),
            item.quantity(),
        )
    }
}

/// A priced cart, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    lines: Vec<ReceiptLine>,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
}

impl Receipt {
    /// Creates a receipt from already computed amounts.
    pub fn new(lines: Vec<ReceiptLine>, subtotal: Decimal, tax: Decimal, total: Decimal) -> Self {
        Self {
            lines,
            subtotal,
            tax,
            total,
        }
    }

    /// Prices and taxes every item of `cart`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError::Pricing`] if any item is invalid or an amount overflows.
    pub fn from_cart(engine: &CartEngine<'_>, cart: &Cart) -> Result<Self, ReceiptError> {
        let items = cart.items();
        let totals = engine.totals(items)?;

        let lines = items
            .iter()
            .map(|item| ReceiptLine::from_item(engine, item))
            .collect();

        Ok(Self::new(lines, totals.subtotal, totals.tax, totals.total))
    }

    /// Item rows in cart order
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Total before tax
    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    /// Rounded tax
    pub fn tax(&self) -> Decimal {
        self.tax
    }

    /// Subtotal plus tax
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Renders the receipt table. The returned string ends with a newline.
    ///
    /// Names and labels are cut to [`CELL_WIDTH`] characters. Amounts and
    /// quantities are never cut: a wider value widens its whole column, which
    /// stays right-aligned.
    pub fn render(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["item", "price", "qty"]);
        builder.push_record(["", "", ""]);

        for line in &self.lines {
            builder.push_record([
                line.name().to_string(),
                money(line.unit_price()),
                line.quantity().to_string(),
            ]);
        }

        builder.push_record(["", "", ""]);

        for (label, amount) in [
            ("subtotal", self.subtotal),
            ("tax", self.tax),
            ("total", self.total),
        ] {
            builder.push_record([label.to_string(), String::new(), money(amount)]);
        }

        let blank_rows = [1, self.lines.len() + 2];
        let mut table = builder.build();

        table
            .with(receipt_theme())
            .with(Padding::new(1, 1, 0, 0))
            .modify(Columns::first(), Width::truncate(CELL_WIDTH))
            .modify(Columns::new(1..), Alignment::right());

        // The blank rows hold every column at its minimum width.
        for row in blank_rows {
            table.modify(Rows::one(row), Width::increase(CELL_WIDTH));
        }

        let mut rendered = table.to_string();
        rendered.push('\n');

        rendered
    }

    /// Writes the rendered receipt to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::Io`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        out.write_all(self.render().as_bytes())?;

        Ok(())
    }
}

/// Turns a `snake_case` product key into a display name.
///
/// Lowercases everything, uppercases the first character and every character
/// following an underscore, and replaces underscores with spaces.
///
/// ```
/// use till::receipt::titleize;
///
/// assert_eq!(titleize("potato_chips"), "Potato Chips");
/// assert_eq!(titleize("LAPTOP"), "Laptop");
/// assert_eq!(Some("i_am_vinskao").map(titleize).as_deref(), Some("I Am Vinskao"));
/// ```
pub fn titleize(name: &str) -> String {
    let mut titled = String::with_capacity(name.len());
    let mut word_start = true;

    for ch in name.chars() {
        if ch == '_' {
            titled.push(' ');
            word_start = true;

            continue;
        }

        for lower in ch.to_lowercase() {
            if word_start {
                titled.extend(lower.to_uppercase());
                word_start = false;
            } else {
                titled.push(lower);
            }
        }
    }

    titled
}

// Borders only: no horizontal rules between rows and spaces between columns.
fn receipt_theme() -> Theme {
    let style = Style::empty()
        .top('-')
        .bottom('-')
        .left('|')
        .right('|')
        .vertical(' ')
        .corner_top_left('+')
        .corner_top_right('+')
        .corner_bottom_left('+')
        .corner_bottom_right('+')
        .intersection_top('-')
        .intersection_bottom('-');

    Theme::from(style)
}

fn money(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    format!("{cents:.2}")
}
