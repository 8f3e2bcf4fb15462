//! Command handlers. Each one calls into the engine and prints the result.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::Path,
};

use chrono::{Local, Utc};
use engine::{
    Customer, CustomerRef, CustomerUpdate, Delivery, Engine, Money, MovementCategory,
    NewCustomer, SettlementFilter, SettlementOutcome, format_amount,
};

use crate::{
    cli::{CashCommand, CustomerCommand, SettleArgs, ZoneCommand},
    error::{AppError, Result},
};

/// Resolves a customer given as list number (starting at 1) or full name.
fn resolve_customer(engine: &Engine, raw: &str) -> Result<CustomerRef> {
    if let Ok(number) = raw.trim().parse::<usize>() {
        return number
            .checked_sub(1)
            .filter(|at| *at < engine.customers().len())
            .ok_or_else(|| AppError::Input(format!("no customer number {number}")));
    }
    engine
        .find_customer_by_name(raw)
        .ok_or_else(|| AppError::Input(format!("customer '{raw}' not found")))
}

fn print_customer(at: CustomerRef, customer: &Customer) {
    println!(
        "{:>3}. {}{} | {} | {} | {} | pending {} | total {}{}",
        at + 1,
        customer.name,
        if customer.tax_id.is_empty() {
            String::new()
        } else {
            format!(" ({})", customer.tax_id)
        },
        customer.phone,
        customer.address,
        customer.zone,
        customer.pending_units,
        customer.lifetime_units,
        customer
            .delivery_day
            .as_deref()
            .map(|day| format!(" | {day}"))
            .unwrap_or_default(),
    );
}

pub fn customer(engine: &mut Engine, command: CustomerCommand) -> Result<()> {
    match command {
        CustomerCommand::Add(args) => {
            let at = engine.add_customer(NewCustomer {
                name: &args.name,
                phone: &args.phone,
                address: &args.address,
                zone: &args.zone,
                delivery_day: args.day.as_deref(),
                tax_id: args.rut.as_deref(),
            })?;
            print_customer(at, engine.customer(at)?);
        }
        CustomerCommand::List => {
            for (at, customer) in engine.customers().iter().enumerate() {
                print_customer(at, customer);
            }
            println!("pending boxes: {}", engine.total_pending());
        }
        CustomerCommand::Order { customer, quantity } => {
            let at = resolve_customer(engine, &customer)?;
            let customer = engine.place_order(at, quantity)?;
            println!("order added to {}", customer.name);
            print_customer(at, customer);
        }
        CustomerCommand::SetPending { customer, units } => {
            let at = resolve_customer(engine, &customer)?;
            print_customer(at, engine.replace_pending(at, units)?);
        }
        CustomerCommand::Edit(args) => {
            let at = resolve_customer(engine, &args.customer)?;
            let update = CustomerUpdate {
                name: args.name,
                phone: args.phone,
                address: args.address,
                zone: args.zone,
                delivery_day: args.day,
                tax_id: args.rut,
            };
            print_customer(at, engine.update_customer(at, update)?);
        }
        CustomerCommand::Delete { customer } => {
            let at = resolve_customer(engine, &customer)?;
            let removed = engine.delete_customer(at)?;
            println!("deleted {}", removed.name);
        }
        CustomerCommand::Find { query } => {
            let found = engine.find_customers(&query);
            if found.is_empty() {
                println!("no customers match '{query}'");
            }
            for (at, customer) in found {
                print_customer(at, customer);
            }
        }
    }
    Ok(())
}

pub fn zone(engine: &mut Engine, command: ZoneCommand) -> Result<()> {
    match command {
        ZoneCommand::Add { name } => {
            let canonical = engine.register_zone(&name)?;
            if canonical.is_empty() {
                return Err(AppError::Input("zone name must not be empty".to_string()));
            }
            println!("zone: {canonical}");
        }
        ZoneCommand::List => {
            println!("default price: {}", format_amount(engine.default_price()));
            for zone in engine.zones() {
                match engine.zone_prices().get(zone) {
                    Some(price) => println!("{zone}: {} (custom)", format_amount(*price)),
                    None => println!("{zone}: {}", format_amount(engine.price_for(zone))),
                }
            }
        }
        ZoneCommand::Price { zone, price } => {
            let canonical = engine.set_zone_price(&zone, price)?;
            println!("{canonical}: {}", format_amount(engine.price_for(&canonical)));
        }
        ZoneCommand::ClearPrice { zone } => {
            if engine.clear_zone_price(&zone)? {
                println!("{}: back to default price", engine.canonical_zone(&zone));
            } else {
                println!("{zone} has no custom price");
            }
        }
        ZoneCommand::DefaultPrice { price } => {
            engine.set_default_price(price)?;
            println!("default price: {}", format_amount(engine.default_price()));
        }
    }
    Ok(())
}

fn confirm(question: &str) -> bool {
    print!("{question} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí")
}

pub fn settle(engine: &mut Engine, args: SettleArgs, export_dir: &Path) -> Result<()> {
    let filter = SettlementFilter {
        zone: args.zone,
        day: args.day,
    };
    let settlement = match engine.prepare_settlement(&filter)? {
        SettlementOutcome::NoMatch(filter) => {
            let zone = filter.zone.unwrap_or_default();
            let day = filter.day.unwrap_or_default();
            println!("no customers match zone '{zone}' / day '{day}'");
            return Ok(());
        }
        SettlementOutcome::NothingToSettle => {
            println!("no pending orders to deliver");
            return Ok(());
        }
        SettlementOutcome::Ready(settlement) => settlement,
    };

    for row in &settlement.rows {
        println!(
            "{} | {} | {} | {} | {} x {} = {}",
            row.name,
            row.phone,
            row.address,
            row.zone,
            row.units,
            format_amount(row.unit_price),
            row.formatted_amount()
        );
    }
    println!(
        "total: {} boxes, {}",
        settlement.total_units,
        format_amount(settlement.total_amount)
    );

    fs::create_dir_all(export_dir)?;
    let date = Local::now().date_naive();
    let yes = args.yes;
    let delivery = engine.deliver(&settlement, export_dir, date, |path| {
        println!("sheet written to {}", path.display());
        yes || confirm("Mark these orders as delivered?")
    })?;
    match delivery {
        Delivery::Committed { customers, .. } => {
            println!("{customers} customers marked as delivered");
        }
        Delivery::Declined { .. } => println!("pending orders left untouched"),
    }
    Ok(())
}

pub fn cash(engine: &mut Engine, command: CashCommand) -> Result<()> {
    match command {
        CashCommand::Add {
            category,
            amount,
            description,
            reference,
        } => {
            let category = MovementCategory::try_from(category.as_str())?;
            let amount: Money = amount.parse()?;
            let movement =
                engine.record_movement(category, amount, &description, &reference, Utc::now())?;
            println!("recorded {}", movement.id);
        }
        CashCommand::List => {
            for movement in engine.movements() {
                println!(
                    "{} | {} | {} | {} | {} | {}",
                    movement.id,
                    movement.timestamp.with_timezone(&Local).format("%d-%m-%Y %H:%M"),
                    movement.category.as_str(),
                    movement.amount,
                    movement.description,
                    movement.reference
                );
            }
        }
        CashCommand::Delete { id } => {
            let removed = engine.delete_movement(&id)?;
            println!("deleted {} ({})", removed.id, removed.amount);
        }
        CashCommand::Totals => {
            let totals = engine.cash_totals()?;
            println!("income:  {}", totals.income);
            println!("expense: {}", totals.expense);
            println!("other:   {}", totals.other);
            println!("balance: {}", totals.balance);
        }
    }
    Ok(())
}
