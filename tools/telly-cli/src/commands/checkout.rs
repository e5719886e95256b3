//! Checkout commands.

use anyhow::{bail, Context as _, Result};
use telly_commerce::checkout::{
    complete_checkout, Address, CheckoutOutcome, CheckoutRequest, CheckoutTotals, Customer, Order,
};
use telly_commerce::OrderNumber;

use super::{CheckoutArgs, CheckoutCommand, PrepareArgs};
use crate::context::Context;

/// Run the checkout command.
pub fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CheckoutCommand::Quote => quote(ctx),
        CheckoutCommand::Prepare(args) => prepare(args, ctx),
        CheckoutCommand::Complete {
            order,
            status,
            message,
            payload,
            receipt,
        } => {
            let outcome = CheckoutOutcome {
                order_number: OrderNumber::new(order),
                payment_status: status,
                message,
            };
            let request = match (payload, receipt.is_some()) {
                (Some(path), _) => Some(read_payload(&path, ctx)?),
                (None, true) => bail!("--receipt needs the --payload written by `prepare`"),
                (None, false) => None,
            };
            complete(&outcome, request, receipt, ctx)
        }
    }
}

fn quote(ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;
    let totals = ctx.config.checkout.totals(cart.total())?;

    if ctx.output.is_json() {
        ctx.output.json(&totals);
        return Ok(());
    }

    ctx.output.header("Order Summary");
    ctx.output.kv("Items", &cart.count().to_string());
    print_totals(&totals, ctx);
    Ok(())
}

fn prepare(args: PrepareArgs, ctx: &Context) -> Result<()> {
    let cart = ctx.open_cart()?;

    let mut address = Address::new(args.address, args.city, args.state, args.zip);
    address.address2 = args.address2;
    let mut customer = Customer::new(args.name, args.email, address);
    customer.phone = args.phone;

    let request = CheckoutRequest::prepare(&cart, customer, args.provider, &ctx.config.checkout)?;
    tracing::info!(
        order = %request.order_number,
        provider = request.provider.as_str(),
        amount = %request.charge_amount(),
        "checkout prepared"
    );

    if let Some(path) = args.output {
        let path = ctx.resolve_path(&path);
        let payload = serde_json::to_string_pretty(&request)?;
        std::fs::write(&path, payload)
            .with_context(|| format!("Failed to write payload: {}", path.display()))?;
        ctx.output
            .success(&format!("Payload written to {}", path.display()));
    } else if ctx.output.is_json() {
        ctx.output.json(&request);
        return Ok(());
    }

    ctx.output.header(&format!(
        "Order {} via {}",
        request.order_number,
        request.provider.display_name()
    ));
    ctx.output.kv("Ship to", &request.customer.address.one_line());
    print_totals(&request.totals, ctx);
    ctx.output.kv("Charge", &request.charge_amount());
    Ok(())
}

fn read_payload(path: &str, ctx: &Context) -> Result<CheckoutRequest> {
    let path = ctx.resolve_path(path);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read payload: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse payload: {}", path.display()))
}

fn complete(
    outcome: &CheckoutOutcome,
    request: Option<CheckoutRequest>,
    receipt_path: Option<String>,
    ctx: &Context,
) -> Result<()> {
    // Check the payload belongs to this outcome before the cart is touched.
    if let Some(ref request) = request {
        if request.order_number != outcome.order_number {
            bail!(
                "Payload is for order {}, not {}",
                request.order_number,
                outcome.order_number
            );
        }
    }

    let mut cart = ctx.open_cart()?;
    let cleared = complete_checkout(&mut cart, outcome)?;

    let order = match request {
        Some(request) if cleared => Some(Order::from_checkout(request, outcome)?),
        _ => None,
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "order_number": outcome.order_number,
            "payment_status": outcome.payment_status.as_str(),
            "cart_cleared": cleared,
            "order": order,
        }));
    } else if cleared {
        ctx.output
            .success(&format!("Order {} confirmed", outcome.order_number));
    } else {
        ctx.output.warn(&format!(
            "Payment {} for {}; cart kept",
            outcome.payment_status.as_str(),
            outcome.order_number
        ));
    }

    if let Some(order) = order {
        let header = ctx.config.business.receipt_header();
        let receipt = order.receipt(&header).to_string();
        match receipt_path {
            Some(path) => {
                let path = ctx.resolve_path(&path);
                std::fs::write(&path, receipt)
                    .with_context(|| format!("Failed to write receipt: {}", path.display()))?;
                ctx.output
                    .success(&format!("Receipt written to {}", path.display()));
            }
            None if !ctx.output.is_json() => println!("\n{}", receipt),
            None => {}
        }
    }
    Ok(())
}

fn print_totals(totals: &CheckoutTotals, ctx: &Context) {
    ctx.output.kv("Subtotal", &totals.subtotal.display());
    ctx.output.kv("Shipping", &totals.shipping_label());
    ctx.output.kv("Tax", &totals.tax.display());
    ctx.output.kv("Total", &totals.total.display());
}
