//! `items list | show`.

use clap::Subcommand;
use stockroom_core::ItemId;
use stockroom_storefront::AppContext;

use super::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum ItemsAction {
    /// List every item
    List {
        /// Only show items in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Hide items that are out of stock
        #[arg(long)]
        in_stock: bool,
    },
    /// Show one item
    Show {
        /// Item ID
        id: String,
    },
}

pub async fn run(ctx: &mut AppContext, action: ItemsAction) -> Result<(), CliError> {
    match action {
        ItemsAction::List { category, in_stock } => {
            let items = ctx.api.list_items().await?;
            let shown: Vec<_> = items
                .iter()
                .filter(|item| !in_stock || item.in_stock())
                .filter(|item| {
                    category
                        .as_deref()
                        .is_none_or(|c| item.category_or_default().eq_ignore_ascii_case(c))
                })
                .cloned()
                .collect();
            output::items(&shown);
        }
        ItemsAction::Show { id } => {
            let item = ctx.api.get_item(&ItemId::new(id)).await?;
            output::item(&item);
        }
    }
    Ok(())
}
