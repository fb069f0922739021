//! One page with every widget its markup supports, wired to the site bus.

use chrono::Datelike;
use tracing::{debug, info};

use crate::albums::AlbumCarousel;
use crate::chrome::{Drawer, DrawerLanguages, LanguageMenus, NavHighlighter};
use crate::config::Settings;
use crate::contact::{ContactForm, Popup};
use crate::dom::Window;
use crate::events::{Bus, DomEvent, SiteEvent};
use crate::fetch::Fetch;
use crate::gallery::Gallery;
use crate::i18n::{SetLanguageOptions, Translator};
use crate::player::{MediaElement, Player, load_catalog};
use crate::press::PressCarousel;
use crate::privacy::PrivacyPage;

pub struct Site<F: Fetch, M: MediaElement> {
    window: Window,
    fetcher: F,
    settings: Settings,
    bus: Bus,
    translator: Translator,
    nav: Option<NavHighlighter>,
    drawer: Option<Drawer>,
    menus: Option<LanguageMenus>,
    drawer_langs: Option<DrawerLanguages>,
    contact: Option<ContactForm>,
    popup: Option<Popup>,
    player: Option<Player<M>>,
    albums: Option<AlbumCarousel>,
    press: Option<PressCarousel>,
    privacy: Option<PrivacyPage>,
    gallery: Option<Gallery>,
}

impl<F: Fetch, M: MediaElement> Site<F, M> {
    /// Mount every widget whose markup is present in `window`.
    pub fn new(mut window: Window, settings: Settings, fetcher: F, media: M) -> Self {
        let bus = Bus::new();
        let translator = Translator::new(settings.i18n.clone(), &window.location, bus.publisher());
        let initial = translator.initial_language(&window);

        let nav = NavHighlighter::mount(&mut window, settings.nav.clone());
        let drawer = Drawer::mount(&window, &settings.drawer);
        let menus = LanguageMenus::mount(&mut window, &initial);
        let drawer_langs = DrawerLanguages::mount(&mut window, &initial);
        let contact = ContactForm::mount(&window);
        let popup = Popup::mount(&window);
        let player = Player::mount(&window, media, settings.player.clone());
        let albums = AlbumCarousel::mount(&window, settings.albums.clone(), bus.publisher());
        let press = PressCarousel::mount(&window, settings.press.clone());
        let privacy = PrivacyPage::mount(&window, settings.privacy.clone(), &settings.site.name);
        let gallery = Gallery::mount(&mut window);

        debug!(
            nav = nav.is_some(),
            drawer = drawer.is_some(),
            menus = menus.is_some(),
            contact = contact.is_some(),
            player = player.is_some(),
            albums = albums.is_some(),
            press = press.is_some(),
            privacy = privacy.is_some(),
            gallery = gallery.is_some(),
            "widgets mounted"
        );

        Self {
            window,
            fetcher,
            settings,
            bus,
            translator,
            nav,
            drawer,
            menus,
            drawer_langs,
            contact,
            popup,
            player,
            albums,
            press,
            privacy,
            gallery,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn player(&self) -> Option<&Player<M>> {
        self.player.as_ref()
    }

    pub fn albums(&self) -> Option<&AlbumCarousel> {
        self.albums.as_ref()
    }

    pub fn press(&self) -> Option<&PressCarousel> {
        self.press.as_ref()
    }

    pub fn contact(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    /// Id of the section the navigation currently marks.
    pub fn active_section(&self) -> Option<String> {
        self.nav.as_ref()?.active_section(&self.window.document)
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.gallery.as_ref()
    }

    /// Fill the gallery grid with `(src, alt)` images.
    pub fn populate_gallery(&mut self, images: &[(String, String)]) {
        if let Some(gallery) = self.gallery.as_ref() {
            gallery.populate(&mut self.window.document, images);
        }
    }

    /// Initial language, music data, press reviews, privacy text and footer year.
    pub async fn start(&mut self) {
        let lang = self.translator.initial_language(&self.window);
        let options = SetLanguageOptions {
            update_url: !self.translator.language_in_url(&self.window),
        };
        // A failure is logged by the translator; the page keeps its built-in text.
        let _ = self
            .translator
            .set_language(&mut self.window, &self.fetcher, &lang, options)
            .await;

        self.set_footer_year();

        if self.player.is_some() || self.albums.is_some() {
            let path = &self.settings.player.data_path;
            let url = self
                .window
                .location
                .resolve(path)
                .map_or_else(|| path.clone(), |u| u.to_string());
            let albums = load_catalog(&self.fetcher, &url).await;
            info!(albums = albums.len(), "music data ready");
            let publisher = self.bus.publisher();
            if let Some(first) = albums.first() {
                publisher.publish(SiteEvent::TracksUpdated {
                    tracks: first.tracks.clone(),
                });
            }
            publisher.publish(SiteEvent::DataReady { albums });
        }

        if let Some(press) = self.press.as_mut() {
            let lang = self.translator.current().unwrap_or(&lang).to_string();
            press.load(&mut self.window, &self.fetcher, &lang).await;
        }

        if let Some(privacy) = self.privacy.as_mut() {
            let lang = privacy.page_language(&self.window);
            privacy.load(&mut self.window, &self.fetcher, &lang).await;
        }

        self.drain().await;
    }

    fn set_footer_year(&mut self) {
        let doc = &mut self.window.document;
        if let Some(year) = doc.get_element_by_id("year") {
            doc.set_text(year, &chrono::Local::now().year().to_string());
        }
    }

    /// Route one DOM event to every widget, then deliver the notifications it caused.
    pub async fn dispatch(&mut self, event: DomEvent) {
        let win = &mut self.window;
        let mut picked = None;
        if let Some(menus) = self.menus.as_mut() {
            picked = menus.handle(win, &event);
        }
        if let Some(langs) = self.drawer_langs.as_mut() {
            picked = langs.handle(win, &event).or(picked);
        }
        if let Some(drawer) = self.drawer.as_mut() {
            drawer.handle(win, &event);
        }
        if let Some(popup) = self.popup.as_mut() {
            popup.handle(win, &event);
        }
        if let Some(gallery) = self.gallery.as_mut() {
            gallery.handle(win, &event);
        }
        if let Some(player) = self.player.as_mut() {
            player.handle(win, &event);
        }
        if let Some(albums) = self.albums.as_mut() {
            albums.handle(win, &event);
        }
        if let Some(press) = self.press.as_mut() {
            press.handle(win, &event);
        }

        match event {
            DomEvent::Scroll { target: None } => {
                if let Some(nav) = self.nav.as_mut() {
                    nav.on_scroll(win);
                }
            }
            DomEvent::Input { target } | DomEvent::Change { target } => {
                if let Some(contact) = self.contact.as_ref() {
                    contact.on_input(&mut win.document, target);
                }
            }
            DomEvent::Submit { form } => self.submit(form).await,
            _ => {}
        }

        if let Some(lang) = picked {
            let _ = self
                .translator
                .set_language(&mut self.window, &self.fetcher, &lang, SetLanguageOptions::default())
                .await;
        }

        self.drain().await;
    }

    async fn submit(&mut self, form: crate::dom::NodeId) {
        let Some(contact) = self.contact.as_ref().filter(|c| c.form() == form) else {
            return;
        };
        let outcome = contact
            .submit(&mut self.window, &self.translator, &self.fetcher)
            .await;
        debug!(?outcome, "contact form submitted");
        if let (Some(notice), Some(popup)) = (outcome.notice(&self.translator), self.popup.as_mut()) {
            popup.open(&mut self.window, &notice);
        }
    }

    /// Forward media events and one animation frame.
    pub async fn tick(&mut self) {
        let events = self
            .player
            .as_mut()
            .map(|p| p.poll_media())
            .unwrap_or_default();
        for event in events {
            self.dispatch(DomEvent::Media(event)).await;
        }
        self.dispatch(DomEvent::AnimationFrame).await;
    }

    /// Deliver bus notifications until none are left.
    async fn drain(&mut self) {
        loop {
            let events = self.bus.drain();
            if events.is_empty() {
                return;
            }
            for event in events {
                self.deliver(event).await;
            }
        }
    }

    async fn deliver(&mut self, event: SiteEvent) {
        let win = &mut self.window;
        match event {
            SiteEvent::LanguageChanged { lang, dict } => {
                if let Some(langs) = self.drawer_langs.as_ref() {
                    langs.set_active(&mut win.document, &lang);
                }
                if let Some(press) = self.press.as_mut() {
                    press.on_dictionary(&mut win.document, &dict);
                    if press.needs_reload(&lang) {
                        press.load(win, &self.fetcher, &lang).await;
                    }
                }
                if let Some(privacy) = self.privacy.as_mut() {
                    let chosen = privacy.supported_language(&lang);
                    if privacy.language() != Some(chosen.as_str()) {
                        privacy.load(win, &self.fetcher, &chosen).await;
                    }
                }
            }
            SiteEvent::TracksUpdated { tracks } => {
                if let Some(player) = self.player.as_mut() {
                    player.set_tracks(win, tracks);
                }
            }
            SiteEvent::DataReady { albums } => {
                if let Some(carousel) = self.albums.as_mut() {
                    carousel.set_albums(win, albums);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
