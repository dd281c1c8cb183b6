//! `checkout`: walk cart -> shipping -> review -> success in one go.

use clap::Args;
use stockroom_core::ShippingDetails;
use stockroom_storefront::AppContext;
use stockroom_storefront::services::PlaceOrder;

use super::CliError;
use crate::output;

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    /// Street address
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    /// State or province
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    country: String,
    #[arg(long)]
    phone: Option<String>,

    /// Place the order instead of only showing the review
    #[arg(short, long)]
    yes: bool,
}

impl From<CheckoutArgs> for ShippingDetails {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            address: args.address,
            city: args.city,
            state: args.state,
            postal_code: args.postal_code,
            country: args.country,
            phone: args.phone,
        }
    }
}

pub async fn run(ctx: &mut AppContext, args: CheckoutArgs) -> Result<(), CliError> {
    let confirm = args.yes;

    match ctx.checkout.place_order(&ctx.cart)? {
        PlaceOrder::Shipping => {}
        PlaceOrder::LoginRequired { return_to, .. } => {
            tracing::debug!(return_to, "Checkout deferred until login");
            output::line("Your cart has been saved. Log in with `stockroom login`, then run checkout again.");
            return Ok(());
        }
    }

    ctx.checkout.submit_shipping(args.into())?;

    output::cart(ctx.cart.cart());
    output::totals(&ctx.checkout.totals(ctx.cart.cart()));
    if !confirm {
        output::line("Re-run with --yes to place the order.");
        return Ok(());
    }

    let confirmation = ctx.checkout.confirm_order(&mut ctx.cart).await?;
    output::confirmation(&confirmation);
    Ok(())
}
