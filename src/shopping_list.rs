//! # Shopping List Output
//!
//! The missing-ingredient list is handed to a [`ShoppingListSink`]. How items are
//! delivered (appended to a shared list, copied, exported) is up to the sink.

use anyhow::{Context, Result};
use log::info;
use std::io::Write;

use crate::recipe_model::RecipeIngredient;

/// Consumer of the final missing-ingredient list
pub trait ShoppingListSink {
    /// Deliver the items, returning how many were delivered
    fn deliver(&mut self, items: &[RecipeIngredient]) -> Result<usize>;
}

/// One `- name` or `- name (amount)` line per item
///
/// # Examples
///
/// ```rust
/// use fridge_recipes::recipe_model::RecipeIngredient;
/// use fridge_recipes::shopping_list::format_shopping_list;
///
/// let items = vec![RecipeIngredient::new("Ham", "2 slices"), RecipeIngredient::new("Salt", "")];
/// assert_eq!(format_shopping_list(&items), "- Ham (2 slices)\n- Salt");
/// ```
pub fn format_shopping_list(items: &[RecipeIngredient]) -> String {
    items
        .iter()
        .map(|item| {
            if item.has_amount() {
                format!("- {} ({})", item.name, item.amount.trim())
            } else {
                format!("- {}", item.name)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the formatted list to any writer (stdout, a file, a buffer)
pub struct TextListSink<W: Write> {
    writer: W,
}

impl<W: Write> TextListSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ShoppingListSink for TextListSink<W> {
    fn deliver(&mut self, items: &[RecipeIngredient]) -> Result<usize> {
        if items.is_empty() {
            return Ok(0);
        }
        writeln!(self.writer, "{}", format_shopping_list(items))
            .context("Failed to write shopping list")?;
        self.writer.flush().context("Failed to flush shopping list")?;
        info!("Delivered {} shopping list items", items.len());
        Ok(items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_keeps_order_and_skips_blank_amounts() {
        let items = vec![
            RecipeIngredient::new("Milk", "200ml"),
            RecipeIngredient::new("Butter", "  "),
            RecipeIngredient::new("Flour", "100g"),
        ];
        assert_eq!(
            format_shopping_list(&items),
            "- Milk (200ml)\n- Butter\n- Flour (100g)"
        );
    }

    #[test]
    fn test_text_sink_writes_lines() -> Result<()> {
        let mut sink = TextListSink::new(Vec::new());
        let delivered = sink.deliver(&[RecipeIngredient::new("Ham", "")])?;

        assert_eq!(delivered, 1);
        assert_eq!(String::from_utf8(sink.into_inner())?, "- Ham\n");
        Ok(())
    }

    #[test]
    fn test_text_sink_empty_list_writes_nothing() -> Result<()> {
        let mut sink = TextListSink::new(Vec::new());
        assert_eq!(sink.deliver(&[])?, 0);
        assert!(sink.into_inner().is_empty());
        Ok(())
    }
}
