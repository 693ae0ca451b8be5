//! Kulturkarte (CLI-Host).
//!
//! Mountet die Headless-Engine und spielt Interaktions-Skripte von stdin ab.
//! Jeder Befehl wird als Engine-Eingabe (Klick, Hover, Zeit) ausgeführt,
//! danach werden die Engine-Events verarbeitet und eine Statuszeile ausgegeben.

use anyhow::{bail, Context};
use clap::Parser;
use cultural_site_map::engine::ElementId;
use cultural_site_map::overlay::NodeAction;
use cultural_site_map::shared::theme;
use cultural_site_map::{
    AppController, AppIntent, AppState, HeadlessEngine, ImageBlob, ImageUploader, MapEngine,
    MapOptions, MemoryUploader, PopupState, SiteCatalog, SiteId,
};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Kulturkarte v{} startet...", env!("CARGO_PKG_VERSION"));

    let args = CliArgs::parse();
    let mut host = MapHost::new(&args)?;
    host.mount()?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("stdin nicht lesbar")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match host.execute(line) {
            Ok(Flow::Continue) => {
                println!("{}", host.status_line());
                host.acknowledge_notice()?;
            }
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("Fehler: {e:#}"),
        }
    }

    host.teardown()?;
    Ok(())
}

/// Kulturkarte: spielt Interaktions-Skripte von stdin gegen eine Headless-Karte ab
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Site-Katalog als JSON (Standard: eingebauter Katalog)
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Kartenoptionen als TOML (Standard: Datei neben der Binary)
    #[arg(long)]
    config: Option<PathBuf>,
}

enum Flow {
    Continue,
    Quit,
}

/// Host einer Karteninstanz über der Headless-Engine.
struct MapHost {
    state: AppState,
    controller: AppController<HeadlessEngine>,
    uploader: MemoryUploader,
}

impl MapHost {
    fn new(args: &CliArgs) -> anyhow::Result<Self> {
        let config_path = args.config.clone().unwrap_or_else(MapOptions::config_path);
        let options = MapOptions::load_from_file(&config_path);

        let catalog = match &args.catalog {
            Some(path) => SiteCatalog::load_from_file(path, &options.bounds())?,
            None => SiteCatalog::builtin(),
        };
        for rejected in catalog.rejected() {
            log::warn!("{}", rejected);
        }

        let mut controller = AppController::new(HeadlessEngine::new());
        // Theme einmalig beim Start; Mount prüft nur noch die Präsenz
        theme::ensure_registered(controller.engine_mut());

        Ok(Self {
            state: AppState::with_catalog(catalog, options),
            controller,
            uploader: MemoryUploader::new(),
        })
    }

    fn mount(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::MountRequested)
    }

    fn teardown(&mut self) -> anyhow::Result<()> {
        self.dispatch(AppIntent::TeardownRequested)
    }

    fn dispatch(&mut self, intent: AppIntent) -> anyhow::Result<()> {
        self.controller.handle_intent(&mut self.state, intent)?;
        self.pump()
    }

    fn pump(&mut self) -> anyhow::Result<()> {
        self.controller.pump_engine_events(&mut self.state)?;
        Ok(())
    }

    fn execute(&mut self, line: &str) -> anyhow::Result<Flow> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let arg = parts.next();

        match command {
            "click" => {
                let site_id = required_site(arg)?;
                let target = self.action_target(&NodeAction::ActivateSite(site_id))?;
                self.controller.engine_mut().click(target);
            }
            "hover" | "unhover" => {
                let site_id = required_site(arg)?;
                let target = self.action_target(&NodeAction::ActivateSite(site_id))?;
                self.controller
                    .engine_mut()
                    .hover(target, command == "hover");
            }
            "close" => {
                let site_id = self.attached_site()?;
                let target = self.action_target(&NodeAction::ClosePopup(site_id))?;
                self.controller.engine_mut().click(target);
            }
            "like" => {
                let site_id = self.attached_site()?;
                let target = self.action_target(&NodeAction::ToggleLike(site_id))?;
                self.controller.engine_mut().click(target);
            }
            "image" => {
                let target = self
                    .controller
                    .engine()
                    .find_popup_element("popup-image")
                    .context("Kein Popup-Bild sichtbar")?;
                self.controller.engine_mut().click(target);
            }
            "background" => {
                let position = self.controller.engine().camera().center;
                self.controller.engine_mut().click_canvas(position);
            }
            "wait" => {
                let ms: u64 = arg
                    .context("wait braucht Millisekunden")?
                    .parse()
                    .context("wait braucht eine ganze Zahl")?;
                self.controller
                    .engine_mut()
                    .advance(Duration::from_millis(ms));
            }
            "upload" => {
                let site_id = required_site(arg)?;
                let path = parts.next().context("upload braucht einen Dateipfad")?;
                self.pump()?;
                self.upload(site_id, Path::new(path))?;
            }
            "status" => {}
            "teardown" => self.teardown()?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => bail!("Unbekannter Befehl '{other}'"),
        }

        self.pump()?;
        Ok(Flow::Continue)
    }

    fn upload(&mut self, site_id: SiteId, path: &Path) -> anyhow::Result<()> {
        match self
            .controller
            .engine()
            .find_action_target(&NodeAction::RequestUpload(site_id.clone()))
        {
            Some(button) => {
                self.controller.engine_mut().click(button);
                self.pump()?;
            }
            None => self.dispatch(AppIntent::UploadRequested {
                site_id: site_id.clone(),
            })?,
        }

        let blob = match ImageBlob::from_file(path) {
            Ok(blob) => blob,
            Err(e) => {
                self.dispatch(AppIntent::UploadCancelled)?;
                return Err(e);
            }
        };
        self.dispatch(AppIntent::ImageFileChosen {
            site_id: site_id.clone(),
            blob,
        })?;

        if let Some(pending) = self.state.ui.take_pending_upload() {
            let result = self.uploader.upload(&pending.blob);
            self.dispatch(AppIntent::ImageUploadFinished {
                site_id: pending.site_id,
                result,
            })?;
        }
        Ok(())
    }

    /// Ein ausgegebener Hinweis gilt als gelesen.
    fn acknowledge_notice(&mut self) -> anyhow::Result<()> {
        if self.state.ui.notice.is_some() {
            self.dispatch(AppIntent::NoticeDismissed)?;
        }
        Ok(())
    }

    fn action_target(&self, action: &NodeAction) -> anyhow::Result<ElementId> {
        self.controller
            .engine()
            .find_action_target(action)
            .with_context(|| format!("Kein Element für {action:?} auf der Karte"))
    }

    fn attached_site(&self) -> anyhow::Result<SiteId> {
        self.state
            .popup
            .attached_site()
            .cloned()
            .context("Kein Popup angehängt")
    }

    fn status_line(&self) -> String {
        let camera = self.controller.engine().camera();
        let active = self
            .state
            .selection
            .active_site_id
            .as_ref()
            .map_or("-".to_string(), |id| id.to_string());
        let popup = match &self.state.popup {
            PopupState::Empty => "-".to_string(),
            PopupState::Scheduled { instance, .. } => format!("geplant({})", instance.site_id),
            PopupState::Attached { instance, .. } => format!(
                "{} [{} {}]",
                instance.site_id,
                if instance.like.liked { "❤️" } else { "🤍" },
                instance.like.count
            ),
        };
        let mut line = format!(
            "t={}ms {:?} aktiv={} popup={} kamera=({:.4}, {:.4}) z{:.2} listener={}",
            self.controller.engine().now().as_millis(),
            self.state.lifecycle,
            active,
            popup,
            camera.center.x,
            camera.center.y,
            camera.zoom,
            self.controller.engine().listener_count(),
        );
        if let Some(notice) = &self.state.ui.notice {
            line.push_str(&format!(" hinweis=\"{notice}\""));
        }
        line
    }
}

fn required_site(arg: Option<&str>) -> anyhow::Result<SiteId> {
    arg.map(SiteId::from).context("Befehl braucht eine Site-ID")
}
