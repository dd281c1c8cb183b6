//! Terminal rendering.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use stockroom_core::{Cart, Item, Order, OrderConfirmation, OrderTotals, UserProfile};
use stockroom_storefront::notify::{Notice, NoticeLevel};

pub fn notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Error => eprintln!("error: {notice}"),
            NoticeLevel::Success | NoticeLevel::Info => println!("{notice}"),
        }
    }
}

pub fn error(message: &str) {
    eprintln!("error: {message}");
}

pub fn line(text: &str) {
    println!("{text}");
}

pub fn profile(profile: &UserProfile) {
    println!("{} <{}> ({})", profile.name, profile.email, profile.role);
}

pub fn users(users: &[UserProfile]) {
    if users.is_empty() {
        println!("No users.");
        return;
    }
    for user in users {
        println!("{:<26} {:<6} {} <{}>", user.id, user.role, user.name, user.email);
    }
}

pub fn items(items: &[Item]) {
    if items.is_empty() {
        println!("No items.");
        return;
    }
    for item in items {
        let stock = if item.in_stock() {
            format!("{} in stock", item.quantity)
        } else {
            "out of stock".to_owned()
        };
        println!(
            "{:<26} {:>10}  {:<30} {:<12} {stock}",
            item.id,
            item.price.to_string(),
            item.name,
            item.category_or_default(),
        );
    }
}

pub fn item(item: &Item) {
    println!("{} ({})", item.name, item.id);
    println!("  price:    {}", item.price);
    println!("  stock:    {}", item.quantity);
    println!("  category: {}", item.category_or_default());
    if let Some(sku) = &item.sku {
        println!("  sku:      {sku}");
    }
    if let Some(image) = &item.image_url {
        println!("  image:    {image}");
    }
    if !item.description.is_empty() {
        println!();
        println!("{}", item.description);
    }
}

pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in cart.lines() {
        println!(
            "{:<26} {:<30} {:>3} x {:>10} = {:>10}",
            line.item_id,
            line.name,
            line.quantity,
            line.unit_price.to_string(),
            line.line_total().to_string(),
        );
    }
    println!("{} items, subtotal {}", cart.item_count(), cart.subtotal());
}

pub fn totals(totals: &OrderTotals) {
    println!("  subtotal: {}", totals.subtotal);
    println!("  tax:      {}", totals.tax);
    if totals.ships_free() {
        println!("  shipping: free");
    } else {
        println!("  shipping: {}", totals.shipping);
    }
    println!("  total:    {}", totals.total);
}

pub fn confirmation(confirmation: &OrderConfirmation) {
    println!("Order #{} ({})", confirmation.order_number, confirmation.order_id);
    for line in &confirmation.items {
        println!("  {} x {}", line.quantity, line.name);
    }
    println!("Total: {}", confirmation.total);
    println!("A confirmation will be sent to {}", confirmation.email);
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders.");
        return;
    }
    for order in orders {
        let placed = order
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:<26} {:<10} {:>10} {:<10} {}",
            order.id,
            placed,
            order.total_price.to_string(),
            order.status.as_str(),
            order.shipping_address.display_name(),
        );
    }
}

pub fn order(order: &Order) {
    println!("Order #{} ({})", order.display_number(), order.id);
    println!("  status:    {}", order.status.as_str());
    println!("  paid:      {}", if order.is_paid { "yes" } else { "no" });
    println!("  delivered: {}", if order.is_delivered { "yes" } else { "no" });
    println!("  ship to:   {}", order.shipping_address.display_name());
    for line in &order.order_items {
        println!("  {} x {} @ {}", line.quantity, line.name, line.price);
    }
    println!("  items:     {}", order.items_price);
    println!("  tax:       {}", order.tax_price);
    println!("  shipping:  {}", order.shipping_price);
    println!("  total:     {}", order.total_price);
}
