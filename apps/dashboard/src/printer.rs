//! # Receipt Printer
//!
//! Where rendered receipts go after a payment. The dashboard has no
//! hardware driver; receipts are logged, or collected in memory for tests.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

/// Sink for printable receipt documents.
pub trait ReceiptPrinter: Send + Sync {
    /// Sends one HTML document to the printer.
    fn print(&self, html: &str);
}

/// Logs each receipt through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPrinter;

impl ReceiptPrinter for LogPrinter {
    fn print(&self, html: &str) {
        info!(bytes = html.len(), "Printing receipt");
        tracing::debug!(target: "melatea::receipt", "{}", html);
    }
}

/// Keeps every printed document.
#[derive(Debug, Default, Clone)]
pub struct MemoryPrinter {
    printed: Arc<Mutex<Vec<String>>>,
}

impl MemoryPrinter {
    pub fn new() -> Self {
        MemoryPrinter::default()
    }

    /// Documents printed so far, oldest first.
    pub fn printed(&self) -> Vec<String> {
        self.printed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ReceiptPrinter for MemoryPrinter {
    fn print(&self, html: &str) {
        self.printed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(html.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_printer_shares_documents() {
        let printer = MemoryPrinter::new();
        let handle = printer.clone();

        printer.print("<p>one</p>");
        printer.print("<p>two</p>");

        assert_eq!(handle.printed(), vec!["<p>one</p>", "<p>two</p>"]);
    }
}
