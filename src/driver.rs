//! Driver
//!
//! Renders every configured cart, in declared order, to a writer.

use std::io;

use tracing::{error, info};

use crate::{
    cart::CartEngine,
    receipt::{Receipt, ReceiptError},
    store::ConfigStore,
};

/// Outcome of a [`run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Carts whose receipt was written
    pub rendered: usize,

    /// Carts skipped because an item could not be priced or taxed
    pub failed: usize,
}

/// Writes a receipt for every cart in `store`.
///
/// Each cart produces its name on one line, the receipt table, then a blank
/// line. A cart that fails to price is logged and skipped without writing
/// anything; the remaining carts are still processed.
///
/// # Errors
///
/// Returns [`ReceiptError::Io`] if writing to `out` fails. Pricing failures
/// never surface here.
pub fn run(store: &ConfigStore, mut out: impl io::Write) -> Result<RunSummary, ReceiptError> {
    let engine = CartEngine::new(store);
    let mut summary = RunSummary::default();

    for cart in store.carts() {
        let receipt = match Receipt::from_cart(&engine, cart) {
            Ok(receipt) => receipt,
            Err(err) => {
                error!(cart = cart.name(), error = %err, "failed to price cart");
                summary.failed += 1;

                continue;
            }
        };

        writeln!(out, "{}", cart.name())?;
        receipt.write_to(&mut out)?;
        writeln!(out)?;

        summary.rendered += 1;
    }

    out.flush()?;

    info!(rendered = summary.rendered, failed = summary.failed, "receipts written");

    Ok(summary)
}
