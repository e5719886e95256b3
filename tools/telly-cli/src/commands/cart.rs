//! Cart commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use telly_commerce::cart::{CartStore, LineItemInput, LineKey, Measurements, CUSTOM_SIZE};
use telly_commerce::{Money, ProductId};
use telly_storage::KeyValueStore;

use super::{AddArgs, CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{line_row, LINE_HEADERS, LINE_WIDTHS};

/// Run the cart command.
pub fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.open_cart()?;

    let output = ctx.output.clone();
    cart.subscribe(move |event| {
        if let Some(message) = event.notification() {
            output.success(&message);
        }
        output.debug(&format!("{} items, {}", event.count, event.total));
    });

    match args.command {
        CartCommand::Add(args) => add(args, &mut cart, ctx),
        CartCommand::Remove {
            product_id,
            size,
            yes,
        } => remove(&product_id, size, yes, &mut cart, ctx),
        CartCommand::Set {
            product_id,
            quantity,
            size,
        } => set(&product_id, size, quantity, &mut cart, ctx),
        CartCommand::Clear { yes } => clear(yes, &mut cart, ctx),
        CartCommand::Show => show(&cart, ctx),
    }
}

fn add<S: KeyValueStore>(args: AddArgs, cart: &mut CartStore<S>, ctx: &Context) -> Result<()> {
    let currency = cart.config().currency;
    let Some(price) = Money::from_decimal(args.price, currency) else {
        bail!("Invalid price: {}", args.price);
    };

    let measurements = measurements_from(&args)?;
    let mut input =
        LineItemInput::new(args.product_id, args.name, price).with_quantity(args.quantity);

    let size = match (args.size, measurements.is_some()) {
        (Some(size), _) => Some(size),
        (None, true) => Some(CUSTOM_SIZE.to_string()),
        (None, false) => None,
    };
    if let Some(size) = size {
        input = input.with_size(size);
    }
    if let Some(measurements) = measurements {
        input = input.with_measurements(measurements);
    }
    if let Some(color) = args.color {
        input = input.with_color(color);
    }
    if let Some(image) = args.image {
        input = input.with_image(image);
    }

    let key = cart.add(input).context("Failed to add item")?;

    if ctx.output.is_json() {
        ctx.output.json(&cart.get(&key));
    }
    Ok(())
}

/// Measurements are all-or-nothing, apart from the optional under bust.
fn measurements_from(args: &AddArgs) -> Result<Option<Measurements>> {
    match (args.bust, args.waist, args.hips) {
        (None, None, None) if args.under_bust.is_none() => Ok(None),
        (Some(bust), Some(waist), Some(hips)) => {
            let mut measurements = Measurements::new(bust, waist, hips);
            if let Some(under_bust) = args.under_bust {
                measurements = measurements.with_under_bust(under_bust);
            }
            Ok(Some(measurements))
        }
        _ => bail!("Custom sizing needs --bust, --waist and --hips"),
    }
}

fn remove<S: KeyValueStore>(
    product_id: &str,
    size: Option<String>,
    yes: bool,
    cart: &mut CartStore<S>,
    ctx: &Context,
) -> Result<()> {
    let product_id = ProductId::new(product_id);

    let (target, lines) = match size {
        Some(ref size) => {
            let key = LineKey::new(product_id.clone(), size.clone());
            let lines = usize::from(cart.get(&key).is_some());
            (key.to_string(), lines)
        }
        None => {
            let lines = cart.items().iter().filter(|i| i.product_id == product_id).count();
            (product_id.to_string(), lines)
        }
    };

    if lines == 0 {
        ctx.output.warn(&format!("Nothing in the cart matches {}", target));
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove {} ({} line(s))?", target, lines))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Removal cancelled");
            return Ok(());
        }
    }

    let removed = match size {
        Some(size) => usize::from(cart.remove(&LineKey::new(product_id, size))?),
        None => cart.remove_product(&product_id)?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "removed": removed }));
    }
    Ok(())
}

fn set<S: KeyValueStore>(
    product_id: &str,
    size: Option<String>,
    quantity: i64,
    cart: &mut CartStore<S>,
    ctx: &Context,
) -> Result<()> {
    let size = size.unwrap_or_else(|| cart.config().default_size.clone());
    let key = LineKey::new(product_id, size);

    if !cart.set_quantity(&key, quantity)? {
        bail!("No line {} in the cart", key);
    }

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "key": key.to_string(),
            "quantity": quantity.max(0),
        }));
    } else if quantity > 0 {
        ctx.output.success(&format!("{} quantity set to {}", key, quantity));
    }
    Ok(())
}

fn clear<S: KeyValueStore>(yes: bool, cart: &mut CartStore<S>, ctx: &Context) -> Result<()> {
    if cart.is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from the cart?", cart.count()))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Clear cancelled");
            return Ok(());
        }
    }

    cart.clear()?;
    ctx.output.success("Cart cleared");
    Ok(())
}

fn show<S: KeyValueStore>(cart: &CartStore<S>, ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": cart.items(),
            "count": cart.count(),
            "total": cart.total().display_amount(),
        }));
        return Ok(());
    }

    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    ctx.output.header("Cart");
    ctx.output.table_row(&LINE_HEADERS, &LINE_WIDTHS);
    for item in cart.items() {
        let row = line_row(item);
        let cols: Vec<&str> = row.iter().map(String::as_str).collect();
        ctx.output.table_row(&cols, &LINE_WIDTHS);
    }

    println!();
    ctx.output.kv("Items", &cart.count().to_string());
    ctx.output.kv("Subtotal", &cart.total().display());
    Ok(())
}
