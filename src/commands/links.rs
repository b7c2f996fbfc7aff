//! Search, GIS, portal, favorite and quick-action commands.

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};

use super::{notify, DashboardState, Notice};
use crate::error::{DashboardError, Result};
use crate::links::favorites::FAVORITES_EXPORT_FILE;
use crate::links::search::{find_quick_action, AGENCY_HOME_URL, NEW_CUSTOMER_URL};
use crate::links::{
    clients_folder_url, gis_lookup, search_url, Favorite, FavoriteList, GisTarget, Portal,
    PortalDirectory, PortalInput, QuickAction, SearchMode, QUICK_ACTIONS,
};
use crate::store::{counter, SearchCounter};

/// Open the search page for `query` and count it
pub fn search(state: &DashboardState, mode: SearchMode, query: &str) -> Notice {
    let result = search_url(mode, query).and_then(|url| {
        state.export.open_url(&url)?;
        counter::increment(&state.store)
    });
    notify(result, |_| Notice::info(format!("Searching {}...", mode)))
}

pub fn searches_today(state: &DashboardState) -> SearchCounter {
    counter::current(&state.store, Local::now().date_naive())
}

/// Resolve the county GIS page. Opening it is left to the caller.
pub fn lookup_gis(address: &str) -> std::result::Result<GisTarget, String> {
    Ok(gis_lookup(address)?)
}

pub fn open_url(state: &DashboardState, url: &str) -> Notice {
    notify(state.export.open_url(url), |_| Notice::info("Opened."))
}

pub fn open_clients_folder(state: &DashboardState) -> Notice {
    open_url(state, &clients_folder_url())
}

pub fn open_agency_home(state: &DashboardState) -> Notice {
    open_url(state, AGENCY_HOME_URL)
}

pub fn open_new_customer(state: &DashboardState) -> Notice {
    open_url(state, NEW_CUSTOMER_URL)
}

pub fn list_quick_actions() -> &'static [QuickAction] {
    QUICK_ACTIONS
}

pub fn open_quick_action(state: &DashboardState, title: &str) -> Notice {
    notify(
        find_quick_action(title).and_then(|action| state.export.open_url(action.url)),
        |_| Notice::info(format!("Opening {}...", title.trim())),
    )
}

// -- portals --

fn portals(state: &DashboardState) -> PortalDirectory {
    PortalDirectory::load(state.store.clone())
}

pub fn list_portals(state: &DashboardState) -> Vec<Portal> {
    portals(state).all()
}

pub fn add_portal(state: &DashboardState, input: PortalInput) -> Notice {
    notify(portals(state).add(input), |portal| {
        Notice::success(format!("Portal \"{}\" added.", portal.name))
    })
}

pub fn remove_portal(state: &DashboardState, id: &str) -> Notice {
    notify(portals(state).remove(id), |_| Notice::info("Portal removed."))
}

pub fn reset_portals(state: &DashboardState) -> Notice {
    notify(portals(state).reset(), |_| {
        Notice::info("Portals reset to defaults.")
    })
}

pub fn open_portal(state: &DashboardState, id: &str) -> Notice {
    notify(
        portals(state)
            .find(id)
            .and_then(|portal| state.export.open_url(&portal.url)),
        |_| Notice::info("Opening portal..."),
    )
}

pub fn export_portals(state: &DashboardState) -> std::result::Result<PathBuf, String> {
    let raw = portals(state).export(Utc::now())?;
    let file_name = format!("portals-export-{}.json", Local::now().format("%Y-%m-%d"));
    Ok(state.export.save_file(&file_name, &raw)?)
}

pub fn import_portals(state: &DashboardState, path: &Path) -> Notice {
    let result = read(path).and_then(|raw| portals(state).import(&raw));
    notify(result, |count| {
        Notice::success(format!("Imported {} portals.", count))
    })
}

// -- favorites --

fn favorites(state: &DashboardState) -> FavoriteList {
    FavoriteList::load(state.store.clone())
}

pub fn list_favorites(state: &DashboardState) -> Vec<Favorite> {
    favorites(state).items().to_vec()
}

pub fn add_favorite(state: &DashboardState, name: &str, url: &str) -> Notice {
    notify(favorites(state).add(name, url), |fav| {
        Notice::success(format!("\"{}\" added to favorites.", fav.name))
    })
}

pub fn remove_favorite(state: &DashboardState, id: &str) -> Notice {
    notify(favorites(state).remove(id), |_| Notice::info("Favorite removed."))
}

pub fn open_favorite(state: &DashboardState, id: &str) -> Notice {
    let list = favorites(state);
    let result = list
        .find(id)
        .and_then(|fav| state.export.open_url(&fav.url));
    notify(result, |_| Notice::info("Opening favorite..."))
}

pub fn export_favorites(state: &DashboardState) -> std::result::Result<PathBuf, String> {
    let raw = favorites(state).export(Utc::now())?;
    Ok(state.export.save_file(FAVORITES_EXPORT_FILE, &raw)?)
}

pub fn import_favorites(state: &DashboardState, path: &Path) -> Notice {
    let result = read(path).and_then(|raw| favorites(state).import(&raw));
    notify(result, |count| {
        Notice::success(format!("Imported {} favorites.", count))
    })
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(DashboardError::from)
}

#[cfg(test)]
mod tests {
    use super::super::testing::session;
    use super::*;
    use crate::error::NoticeLevel;
    use crate::workflow::fake::{FakeBackend, FakeReply};

    #[test]
    fn test_search_opens_and_counts() {
        let s = session(FakeBackend::new(FakeReply::text("x")));
        let notice = search(&s.state, SearchMode::Web, "umbrella policy");
        assert_eq!(notice, Notice::info("Searching web..."));
        assert_eq!(
            s.launcher.opened(),
            vec!["https://www.google.com/search?q=umbrella%20policy"]
        );
        assert_eq!(searches_today(&s.state).count, 1);

        let blank = search(&s.state, SearchMode::Web, " ");
        assert_eq!(blank.level, NoticeLevel::Warning);
        assert_eq!(searches_today(&s.state).count, 1);
    }

    #[test]
    fn test_portal_commands() {
        let s = session(FakeBackend::new(FakeReply::text("x")));
        let bad = add_portal(
            &s.state,
            PortalInput {
                name: "Bad".into(),
                url: "https://bad host".into(),
                ..PortalInput::default()
            },
        );
        assert_eq!(bad.level, NoticeLevel::Danger);

        let ok = add_portal(
            &s.state,
            PortalInput {
                name: "Travelers".into(),
                url: "travelers.com".into(),
                ..PortalInput::default()
            },
        );
        assert_eq!(ok.level, NoticeLevel::Success);
        assert_eq!(list_portals(&s.state).len(), 8);

        open_portal(&s.state, "nationwide");
        assert_eq!(
            s.launcher.opened(),
            vec!["https://agentcenter.nationwide.com/home"]
        );

        let path = export_portals(&s.state).unwrap();
        reset_portals(&s.state);
        assert_eq!(list_portals(&s.state).len(), 7);
        assert_eq!(import_portals(&s.state, &path).level, NoticeLevel::Success);
        assert_eq!(list_portals(&s.state).len(), 8);
    }

    #[test]
    fn test_favorite_commands() {
        let s = session(FakeBackend::new(FakeReply::text("x")));
        assert!(export_favorites(&s.state).is_err());
        add_favorite(&s.state, "Zillow", "zillow.com");
        let favs = list_favorites(&s.state);
        assert_eq!(favs[0].description, "zillow.com");

        open_favorite(&s.state, &favs[0].id);
        assert_eq!(s.launcher.opened(), vec!["https://zillow.com/"]);

        let path = export_favorites(&s.state).unwrap();
        assert_eq!(path.file_name().unwrap(), "favorites-export.json");
        remove_favorite(&s.state, &favs[0].id);
        assert!(list_favorites(&s.state).is_empty());
        import_favorites(&s.state, &path);
        assert_eq!(list_favorites(&s.state).len(), 1);
    }

    #[test]
    fn test_quick_actions_and_gis() {
        let s = session(FakeBackend::new(FakeReply::text("x")));
        assert_eq!(open_quick_action(&s.state, "Reports").level, NoticeLevel::Info);
        assert_eq!(open_quick_action(&s.state, "Nope").level, NoticeLevel::Danger);
        assert_eq!(list_quick_actions().len(), 7);

        let target = lookup_gis("5 Main St, Raleigh, Wake County").unwrap();
        assert_eq!(target.county, "Wake County");
        assert!(lookup_gis("5 Main St").unwrap_err().contains("county"));
    }
}
