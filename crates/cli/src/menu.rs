//! Menu actions: each one prompts, calls the repository, and prints the
//! outcome it reports.

use std::io::{self, Write};

use stockroom_catalog::{Product, ProductKind, ProductPatch};
use stockroom_store::{AddOutcome, DeleteOutcome, ProductStore, StoreError, UpdateOutcome};

use crate::prompt;

/// Clear the screen (ANSI; harmless where unsupported).
pub fn clear_screen() {
    let _ = write_clear(&mut io::stdout());
}

/// The clear sequence has no trailing newline, so it must be flushed
/// explicitly or it sits in the stdout buffer until the next print.
fn write_clear(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\x1b[2J\x1b[H")?;
    out.flush()
}

pub fn show_menu() {
    println!("\n{}", "*".repeat(40));
    println!("          --- Product Inventory ---");
    println!("          1. Add product");
    println!("          2. List products");
    println!("          3. Update product");
    println!("          4. Delete product");
    println!("          5. Exit");
    println!("{}", "*".repeat(40));
}

/// Read a menu choice; `None` means "ask again".
pub fn read_choice() -> Option<u32> {
    match prompt::ask("Select an option").parse::<u32>() {
        Ok(choice) if (1..=5).contains(&choice) => Some(choice),
        _ => {
            println!("Please enter a number between 1 and 5.");
            None
        }
    }
}

pub async fn add_product(store: &mut dyn ProductStore) -> Result<(), StoreError> {
    let kind = prompt::ask_kind();
    let name = prompt::ask_required("Product name");
    let price = prompt::ask_price("Price");
    let quantity = prompt::ask_quantity("Stock quantity");

    let product = match kind.as_str() {
        "hardware" => {
            let warranty = prompt::ask_required("Warranty in years (0 if none)");
            Product::hardware(name, price, quantity, warranty)
        }
        _ => {
            let date = prompt::ask_date("Expiration date (dd/mm/yyyy)");
            Product::software(name, price, quantity, date)
        }
    };

    // The inputs were validated at the prompts, but construction still has
    // the final say.
    let product = match product {
        Ok(product) => product,
        Err(e) => {
            println!("Error: {e}");
            return Ok(());
        }
    };

    let name = product.name().to_string();
    match store.add(product).await? {
        AddOutcome::Added => println!("Product {name} added successfully."),
        AddOutcome::AlreadyExists => println!("A product with the same name already exists."),
    }
    Ok(())
}

pub async fn list_products(store: &dyn ProductStore) -> Result<(), StoreError> {
    let products = store.list_all().await?;
    if products.is_empty() {
        println!("The inventory is empty.");
        return Ok(());
    }
    for product in &products {
        print_product(product);
    }
    Ok(())
}

fn print_product(product: &Product) {
    println!("\n{}", "-".repeat(40));
    println!("ID: {}", product.id());
    println!("Name: {}", product.name());
    println!("Price: ${:.2}", product.price());
    println!("Stock quantity: {}", product.stock_quantity());
    match product.kind() {
        ProductKind::Hardware { warranty } => println!("Warranty: {warranty} years"),
        ProductKind::Software { expiration_date } => {
            println!("Expiration date: {expiration_date}")
        }
    }
    println!("{}", "-".repeat(40));
}

pub async fn update_product(store: &mut dyn ProductStore) -> Result<(), StoreError> {
    let name = prompt::ask_required("Name of the product to update");
    let Some(current) = store.get(&name).await? else {
        println!("Product not found.");
        return Ok(());
    };

    let mut patch = ProductPatch {
        name: prompt::ask_optional("New name (blank to keep)"),
        price: prompt::ask_optional_price("New price (blank to keep)"),
        stock_quantity: prompt::ask_optional_quantity("New stock quantity (blank to keep)"),
        ..Default::default()
    };
    match current.kind() {
        ProductKind::Hardware { .. } => {
            patch.warranty = prompt::ask_optional("New warranty (blank to keep)");
        }
        ProductKind::Software { .. } => {
            patch.expiration_date = prompt::ask_optional_date("New expiration date (blank to keep)");
        }
    }

    if patch.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    match store.update(&name, &patch).await {
        Ok(UpdateOutcome::Updated) => println!("Product {name} updated successfully."),
        Ok(UpdateOutcome::NotFound) => println!("Product not found."),
        Ok(UpdateOutcome::NameTaken) => {
            println!("A product with the new name already exists.")
        }
        // Malformed values are reported and the update dropped; the record
        // is untouched.
        Err(StoreError::Domain(e)) => println!("Error updating the product: {e}"),
        Err(e) => return Err(e),
    }
    Ok(())
}

pub async fn delete_product(store: &mut dyn ProductStore) -> Result<(), StoreError> {
    let name = prompt::ask_required("Name of the product to delete");
    match store.delete(&name).await? {
        DeleteOutcome::Deleted => println!("Product {name} deleted successfully."),
        DeleteOutcome::NotFound => println!("Product not found."),
    }
    Ok(())
}
