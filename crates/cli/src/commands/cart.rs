//! `cart show | add | update | remove | clear`.

use clap::Subcommand;
use stockroom_core::ItemId;
use stockroom_storefront::AppContext;
use stockroom_storefront::guards::Guard;

use super::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add an item
    Add {
        /// Item ID
        id: String,
        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set the quantity of a line
    Update {
        /// Item ID
        id: String,
        /// New quantity (at least 1)
        quantity: u32,
    },
    /// Remove a line
    Remove {
        /// Item ID
        id: String,
    },
    /// Empty the cart
    Clear,
}

pub async fn run(ctx: &mut AppContext, action: CartAction) -> Result<(), CliError> {
    if !matches!(action, CartAction::Show) {
        ctx.require(Guard::Authenticated, "/cart").await?;
    }

    let cart = match action {
        CartAction::Show => ctx.cart.cart(),
        CartAction::Add { id, quantity } => ctx
            .cart
            .add(&ItemId::new(id), quantity)
            .await?,
        CartAction::Update { id, quantity } => ctx
            .cart
            .update(&ItemId::new(id), quantity)
            .await?,
        CartAction::Remove { id } => ctx
            .cart
            .remove(&ItemId::new(id))
            .await?,
        CartAction::Clear => ctx
            .cart
            .clear()
            .await?,
    };
    output::cart(cart);
    Ok(())
}
