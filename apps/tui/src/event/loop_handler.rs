use color_eyre::Result;
use crossterm::event::{self, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::time::Duration;

use crate::app::actions::AppActions;
use crate::app::{handle_input, handle_mouse, App};
use crate::domain::Orphanage;
use crate::ui;

/// Run the application in headless mode (no UI)
pub async fn run_headless(actions: &AppActions, json: bool) -> Result<()> {
    let orphanages = actions.fetch_orphanages().await?;

    if json {
        render_headless_json(&orphanages)?;
    } else {
        render_headless_list(&orphanages);
    }

    Ok(())
}

fn render_headless_list(orphanages: &[Orphanage]) {
    println!("\nOrphanages");
    println!("==========");
    println!("Total: {}", orphanages.len());

    for orphanage in orphanages {
        println!(
            "- #{} {} | {:.6}, {:.6} | {} | weekends: {} | images: {}",
            orphanage.id,
            orphanage.name,
            orphanage.latitude,
            orphanage.longitude,
            orphanage.opening_hours,
            if orphanage.open_on_weekends { "yes" } else { "no" },
            orphanage.images.len()
        );
        if let Some(number) = &orphanage.whatsapp_number {
            println!("  WhatsApp: {number}");
        }
    }
}

fn render_headless_json(orphanages: &[Orphanage]) -> Result<()> {
    let json = serde_json::to_string_pretty(orphanages)?;
    println!("{json}");
    Ok(())
}

/// Run the main application event loop
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    app.refresh_orphanages().await;

    loop {
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    handle_input(app, key.code).await;
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Mouse(mouse)) => handle_mouse(app, mouse),
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(Event::FocusGained | Event::FocusLost | Event::Paste(_)) | Err(_) => {}
            }
        }

        // Pick up the submission result once the request task is done
        app.poll_submission().await;
    }
    Ok(())
}
