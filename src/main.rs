use tracing::{error, info, warn, Instrument};

use inventory_store::{setup_tracing, InventoryConfig, InventorySystem};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = InventoryConfig::from_env()?;
    let system = InventorySystem::start(&config).await?;
    let service = system.service.clone();

    // Print the list screen whenever the table changes
    let list_symbol = service.currency_symbol().to_string();
    let list_view = service.subscribe_all(move |items| {
        for item in items {
            info!(
                item_id = %item.id,
                name = %item.name,
                price = %item.formatted_price(&list_symbol),
                in_stock = item.quantity_in_stock,
                "List row"
            );
        }
    });

    let span = tracing::info_span!("add_items");
    let widget_id = async {
        if !service.validate("Widget", "2.50", "2") {
            warn!("Widget entry is incomplete");
        }
        let widget_id = service.add_item("Widget", "2.50", "2").await?;
        service.add_item("Gadget", "10", "0").await?;

        // malformed numbers are rejected, nothing is written
        if let Err(e) = service.add_item("Gizmo", "abc", "3").await {
            warn!(error = %e, "Entry refused");
        }
        Ok::<_, inventory_store::InventoryError>(widget_id)
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("detail_screen", item_id = %widget_id);
    async {
        let mut detail = service.observe_by_id(widget_id);
        while let Some(item) = detail.next().await {
            info!(
                price = %service.formatted_price(&item),
                in_stock = item.quantity_in_stock,
                sell_enabled = service.is_stock_available(&item),
                "Detail view"
            );
            if !service.is_stock_available(&item) {
                break;
            }
            if let Err(e) = service.sell(&item).await {
                error!(error = %e, "Sell failed");
                break;
            }
        }

        match service.update_item(widget_id, "Widget XL", "3.75", "5").await {
            Ok(updated) => info!(updated, "Edit submitted"),
            Err(e) => error!(error = %e, "Edit failed"),
        }
        if let Ok(Some(item)) = service.fetch_item(widget_id).await {
            if let Err(e) = service.delete_item(&item).await {
                error!(error = %e, "Delete failed");
            }
        }
    }
    .instrument(span)
    .await;

    list_view.unsubscribe();
    drop(service);

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
