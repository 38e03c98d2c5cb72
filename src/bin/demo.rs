//! Interactive demo: a main menu that opens one-off alert and confirm menus.
//!
//! Set `RETRO_MENU_LOG=<file>` to write logs there (filtered by `RUST_LOG`,
//! default `retro_menu=debug`). Logging is off otherwise, since the screen
//! belongs to the menus.

use std::fs::File;
use std::io;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use retro_menu::menu::{Alert, Confirm, Menu, MenuConfig, MenuId, MenuMut, Select};
use retro_menu::page::{Page, PageConfig};
use retro_menu::runtime;

fn show_main(page: &mut Page, main: MenuId) {
    let Some(mut menu) = page.menu(main) else {
        return;
    };
    let select = Select::new(
        "Pick an example.",
        ["Show a message", "Ask a question", "Quit"],
    )
    .message("Up/Down or w/s move, Enter or a double click chooses, Ctrl+C quits.")
    .on_complete(move |menu, index, _| {
        menu.destroy();
        let page = menu.page();
        match index {
            0 => show_message(page, main),
            1 => ask(page, main),
            _ => page.request_quit(),
        }
    });
    if let Err(err) = menu.select(select) {
        warn!(%err, "main menu could not be shown");
    }
}

/// Close a one-off dialog menu and go back to the main menu.
fn back_to_main(menu: &mut MenuMut<'_>, main: MenuId) {
    let id = menu.id();
    let page = menu.page();
    page.remove_menu(id);
    show_main(page, main);
}

fn show_message(page: &mut Page, main: MenuId) {
    Menu::alert_dialog(
        page,
        "Message",
        Alert::new("I am a nice message.").on_complete(move |menu| back_to_main(menu, main)),
    );
}

fn ask(page: &mut Page, main: MenuId) {
    Menu::confirm_dialog(
        page,
        "Confirm me",
        Confirm::new("Are you OK?").on_complete(move |menu, fine| {
            let id = menu.id();
            let page = menu.page();
            page.remove_menu(id);
            respond(page, main, fine);
        }),
    );
}

fn respond(page: &mut Page, main: MenuId, fine: bool) {
    let text = if fine {
        "That's great!"
    } else {
        "You should better go see a doctor."
    };
    Menu::alert_dialog(
        page,
        "Response",
        Alert::new(text).on_complete(move |menu| back_to_main(menu, main)),
    );
}

fn init_logging() -> io::Result<()> {
    let Some(path) = std::env::var_os("RETRO_MENU_LOG") else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("retro_menu=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    init_logging()?;

    let mut page = Page::new(PageConfig::default());
    let main = page
        .create_menu(MenuConfig::new().with_title("RetroMenu Demo"))
        .map_err(io::Error::other)?;
    show_main(&mut page, main);
    runtime::run(&mut page).await
}
