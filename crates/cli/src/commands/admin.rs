//! `admin items | users | orders`.
//!
//! Every action passes the admin guard first.

use std::path::Path;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use stockroom_core::{Item, ItemId, ItemImage, ItemInput, Money, OrderId, OrderStatus, Role, UserId};
use stockroom_storefront::api::StatusUpdate;
use stockroom_storefront::guards::Guard;
use stockroom_storefront::{AppContext, AppError};

use super::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Manage inventory
    Items {
        #[command(subcommand)]
        action: AdminItemsAction,
    },
    /// Manage accounts
    Users {
        #[command(subcommand)]
        action: AdminUsersAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: AdminOrdersAction,
    },
}

#[derive(Subcommand)]
pub enum AdminItemsAction {
    /// Create an item
    Create(ItemArgs),
    /// Change an item; omitted fields keep their current value
    Update {
        /// Item ID
        id: String,
        #[command(flatten)]
        fields: ItemUpdateArgs,
    },
    /// Delete an item
    Delete {
        /// Item ID
        id: String,
    },
}

#[derive(Args)]
pub struct ItemArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: Decimal,
    /// Units in stock
    #[arg(long, default_value_t = 0)]
    quantity: u32,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// JPG or PNG file, at most 5MB
    #[arg(long)]
    image: Option<String>,
}

#[derive(Args)]
pub struct ItemUpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<Decimal>,
    #[arg(long)]
    quantity: Option<u32>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// JPG or PNG file, at most 5MB
    #[arg(long)]
    image: Option<String>,
}

#[derive(Subcommand)]
pub enum AdminUsersAction {
    /// List every account
    List,
    /// Change an account's role
    Role {
        /// User ID
        id: String,
        /// `user` or `admin`
        role: Role,
    },
    /// Delete an account
    Delete {
        /// User ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AdminOrdersAction {
    /// List every order
    List {
        /// Only show orders with this status
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Change an order's status
    Status {
        /// Order ID
        id: String,
        /// pending, processing, shipped, delivered, cancelled, refunded or paid
        status: OrderStatus,
        /// Why the order was cancelled or refunded
        #[arg(long)]
        reason: Option<String>,
    },
}

pub async fn run(ctx: &mut AppContext, action: AdminAction) -> Result<(), CliError> {
    match action {
        AdminAction::Items { action } => {
            ctx.require(Guard::Admin, "/admin/items").await?;
            items(ctx, action).await
        }
        AdminAction::Users { action } => {
            ctx.require(Guard::Admin, "/admin/users").await?;
            users(ctx, action).await
        }
        AdminAction::Orders { action } => {
            ctx.require(Guard::Admin, "/admin/orders").await?;
            orders(ctx, action).await
        }
    }
}

async fn items(ctx: &AppContext, action: AdminItemsAction) -> Result<(), CliError> {
    match action {
        AdminItemsAction::Create(args) => {
            let input = ItemInput {
                name: args.name,
                sku: args.sku,
                description: args.description,
                quantity: args.quantity,
                price: Money::new(args.price),
                category: args.category,
                image: read_image(args.image.as_deref()).await?,
            };
            input.validate().map_err(AppError::from)?;
            let item = ctx.api.create_item(&input).await?;
            output::line("Item created");
            output::item(&item);
        }
        AdminItemsAction::Update { id, fields } => {
            let id = ItemId::new(id);
            let current = ctx.api.get_item(&id).await?;
            let image = read_image(fields.image.as_deref()).await?;
            let input = merge(current, fields, image);
            input.validate().map_err(AppError::from)?;
            let item = ctx.api.update_item(&id, &input).await?;
            output::line("Item updated");
            output::item(&item);
        }
        AdminItemsAction::Delete { id } => {
            ctx.api.delete_item(&ItemId::new(id)).await?;
            output::line("Item deleted");
        }
    }
    Ok(())
}

fn merge(current: Item, fields: ItemUpdateArgs, image: Option<ItemImage>) -> ItemInput {
    ItemInput {
        name: fields.name.unwrap_or(current.name),
        sku: fields.sku.or(current.sku),
        description: fields
            .description
            .or_else(|| Some(current.description).filter(|d| !d.is_empty())),
        quantity: fields.quantity.unwrap_or(current.quantity),
        price: fields.price.map_or(current.price, Money::new),
        category: fields.category.or(current.category),
        image,
    }
}

async fn users(ctx: &AppContext, action: AdminUsersAction) -> Result<(), CliError> {
    match action {
        AdminUsersAction::List => output::users(&ctx.api.list_users().await?),
        AdminUsersAction::Role { id, role } => {
            let user = ctx.api.update_user_role(&UserId::new(id), role).await?;
            output::line("Role updated");
            output::profile(&user);
        }
        AdminUsersAction::Delete { id } => {
            ctx.api.delete_user(&UserId::new(id)).await?;
            output::line("User deleted");
        }
    }
    Ok(())
}

async fn orders(ctx: &AppContext, action: AdminOrdersAction) -> Result<(), CliError> {
    match action {
        AdminOrdersAction::List { status } => {
            let mut orders = ctx.api.all_orders().await?;
            if let Some(status) = status {
                orders.retain(|order| order.status == status);
            }
            output::orders(&orders);
        }
        AdminOrdersAction::Status { id, status, reason } => {
            let update = StatusUpdate {
                reason,
                ..StatusUpdate::new(status)
            };
            let order = ctx.api.update_order_status(&OrderId::new(id), &update).await?;
            output::line(&format!("Order status updated to {status}"));
            output::order(&order);
        }
    }
    Ok(())
}

async fn read_image(path: Option<&str>) -> Result<Option<ItemImage>, CliError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.to_owned(),
            source,
        })?;
    let file_name = Path::new(path)
        .file_name()
        .map_or_else(|| path.to_owned(), |name| name.to_string_lossy().into_owned());
    Ok(Some(ItemImage {
        content_type: content_type(&file_name).to_owned(),
        file_name,
        bytes,
    }))
}

fn content_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type("lamp.PNG"), "image/png");
        assert_eq!(content_type("lamp.jpeg"), "image/jpeg");
        assert_eq!(content_type("lamp.gif"), "application/octet-stream");
        assert_eq!(content_type("lamp"), "application/octet-stream");
    }
}
