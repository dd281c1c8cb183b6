//! `orders mine | show`.

use clap::Subcommand;
use stockroom_core::OrderId;
use stockroom_storefront::AppContext;
use stockroom_storefront::guards::Guard;

use super::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List your orders
    Mine,
    /// Show one order
    Show {
        /// Order ID
        id: String,
    },
}

pub async fn run(ctx: &mut AppContext, action: OrdersAction) -> Result<(), CliError> {
    ctx.require(Guard::Authenticated, "/orders").await?;
    match action {
        OrdersAction::Mine => output::orders(&ctx.api.my_orders().await?),
        OrdersAction::Show { id } => output::order(&ctx.api.get_order(&OrderId::new(id)).await?),
    }
    Ok(())
}
