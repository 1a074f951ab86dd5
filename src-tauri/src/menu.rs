//! Application menu; its accelerators are the browser's keyboard shortcuts

use tauri::menu::{Menu, MenuBuilder, MenuItemBuilder, SubmenuBuilder};
use tauri::AppHandle;
use wisp_core::Shortcut;

pub fn build(app: &AppHandle) -> tauri::Result<Menu<tauri::Wry>> {
    let mut browser_menu = SubmenuBuilder::new(app, "Browser");
    for shortcut in Shortcut::ALL {
        let item = MenuItemBuilder::with_id(shortcut.id(), shortcut.label())
            .accelerator(shortcut.accelerator())
            .build(app)?;
        browser_menu = browser_menu.item(&item);
    }
    let browser_menu = browser_menu.separator().quit().build()?;

    // Text fields in the UI need the standard editing shortcuts
    let edit_menu = SubmenuBuilder::new(app, "Edit")
        .undo()
        .redo()
        .separator()
        .cut()
        .copy()
        .paste()
        .select_all()
        .build()?;

    MenuBuilder::new(app)
        .item(&browser_menu)
        .item(&edit_menu)
        .build()
}
