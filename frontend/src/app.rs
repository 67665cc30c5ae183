use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{ApiClient, BrowserClient, ExpenseFilter, GlooTransport};
use crate::cache::DataCache;
use crate::config::{AppConfig, AppSettings};
use crate::error::ApiError;
use crate::notify::{Notifier, ToastQueue};
use crate::session::SessionStore;
use crate::storage::BrowserStorage;
use crate::sync::{refresh_all, refresh_categories, refresh_expenses};
use crate::views::analytics::AnalyticsPage;
use crate::views::auth::AuthScreen;
use crate::views::categories::CategoriesPage;
use crate::views::dashboard::DashboardPage;
use crate::views::expenses::ExpensesPage;
use crate::views::layout::Layout;
use crate::views::settings::SettingsPage;
use crate::views::toasts::ToastContainer;

#[derive(Clone, Copy, PartialEq)]
enum AuthStatus {
    Authenticated,
    Unauthenticated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Expenses,
    Categories,
    Analytics,
    Settings,
}

/// Bumped whenever the cache changes so context consumers re-render.
#[derive(Default, PartialEq)]
pub struct Revision(u32);

impl Reducible for Revision {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Revision(self.0.wrapping_add(1)))
    }
}

/// Everything a page needs: the client, the shared cache and the toast
/// queue. Pages never own server data themselves.
#[derive(Clone)]
pub struct AppContext {
    pub api: Rc<BrowserClient>,
    pub cache: Rc<RefCell<DataCache>>,
    pub notifier: Notifier,
    pub settings: UseStateHandle<AppSettings>,
    revision: u32,
    bump: UseReducerDispatcher<Revision>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.api, &other.api)
            && Rc::ptr_eq(&self.cache, &other.cache)
            && self.revision == other.revision
            && *self.settings == *other.settings
            && self.notifier == other.notifier
    }
}

impl AppContext {
    /// Changes every time the cache is refreshed or patched.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn currency_symbol(&self) -> String {
        self.settings.currency_symbol.clone()
    }

    /// Re-renders everything that reads the cache.
    pub fn cache_changed(&self) {
        self.bump.dispatch(());
    }

    /// Surfaces a failed call as a toast. 401s never get here.
    pub fn report(&self, err: &ApiError) {
        self.notifier.error(err.user_message());
    }

    /// Refetches whatever `section` displays.
    pub fn reload(&self, section: Section) {
        let ctx = self.clone();
        spawn_local(async move {
            let result = match section {
                Section::Categories => refresh_categories(&ctx.api, &ctx.cache).await,
                Section::Settings => return,
                _ => refresh_all(&ctx.api, &ctx.cache, &ExpenseFilter::All).await,
            };
            ctx.cache_changed();
            if let Err(err) = result {
                ctx.report(&err);
            }
        });
    }

    /// Reloads the expense list through a filter endpoint.
    pub fn apply_filter(&self, filter: ExpenseFilter, success: Option<&'static str>) {
        let ctx = self.clone();
        spawn_local(async move {
            match refresh_expenses(&ctx.api, &ctx.cache, &filter).await {
                Ok(Some(())) => {
                    ctx.cache_changed();
                    if let Some(message) = success {
                        ctx.notifier.success(message);
                    }
                }
                Ok(None) => {}
                Err(err) => ctx.report(&err),
            }
        });
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let api = use_memo(
        |_| {
            let session = Rc::new(SessionStore::new(BrowserStorage));
            ApiClient::new(AppConfig::from_build_env(), GlooTransport, session)
        },
        (),
    );
    let cache = use_memo(|_| RefCell::new(DataCache::default()), ());
    let auth_status = {
        let api = api.clone();
        use_state(move || match api.session().restore() {
            Some(session) => {
                log::info!("restored session for {}", session.user.username);
                AuthStatus::Authenticated
            }
            None => AuthStatus::Unauthenticated,
        })
    };
    let active_section = use_state(|| Section::Dashboard);
    let settings = use_state(|| AppSettings::load(&BrowserStorage));
    let toasts = use_reducer(ToastQueue::default);
    let revision = use_reducer(Revision::default);

    let ctx = AppContext {
        api: api.clone(),
        cache: cache.clone(),
        notifier: Notifier::new(toasts.dispatcher()),
        settings: settings.clone(),
        revision: revision.0,
        bump: revision.dispatcher(),
    };

    {
        let api = api.clone();
        let cache = cache.clone();
        let auth_status = auth_status.clone();
        let bump = revision.dispatcher();
        use_effect_with_deps(
            move |_| {
                api.set_unauthorized_hook(move || {
                    cache.borrow_mut().clear();
                    bump.dispatch(());
                    auth_status.set(AuthStatus::Unauthenticated);
                });
                || ()
            },
            (),
        );
    }

    // Refresh the visible section when the tab comes back into view.
    {
        let ctx = ctx.clone();
        let section = *active_section;
        let authenticated = *auth_status == AuthStatus::Authenticated;
        use_effect_with_deps(
            move |_| {
                let listener = web_sys::window()
                    .and_then(|window| window.document())
                    .filter(|_| authenticated)
                    .map(|document| {
                        let target = document.clone();
                        EventListener::new(&document, "visibilitychange", move |_| {
                            let visible =
                                target.visibility_state() == web_sys::VisibilityState::Visible;
                            if visible && ctx.api.session().is_authenticated() {
                                ctx.reload(section);
                            }
                        })
                    });
                move || drop(listener)
            },
            (section, authenticated),
        );
    }

    let on_select = {
        let active_section = active_section.clone();
        Callback::from(move |section: Section| active_section.set(section))
    };

    let on_authenticated = {
        let auth_status = auth_status.clone();
        let active_section = active_section.clone();
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            ctx.notifier.success("Login successful!");
            active_section.set(Section::Dashboard);
            auth_status.set(AuthStatus::Authenticated);
        })
    };

    let on_logout = {
        let auth_status = auth_status.clone();
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            ctx.api.logout();
            ctx.cache.borrow_mut().clear();
            ctx.cache_changed();
            auth_status.set(AuthStatus::Unauthenticated);
            ctx.notifier.info("Logged out successfully");
        })
    };

    let username = api
        .session()
        .current()
        .map(|s| s.user.username)
        .unwrap_or_default();

    let content = match *active_section {
        Section::Dashboard => html! { <DashboardPage /> },
        Section::Expenses => html! { <ExpensesPage /> },
        Section::Categories => html! { <CategoriesPage /> },
        Section::Analytics => html! { <AnalyticsPage /> },
        Section::Settings => html! { <SettingsPage /> },
    };

    let body = if *auth_status == AuthStatus::Unauthenticated {
        html! { <AuthScreen on_authenticated={on_authenticated} /> }
    } else {
        html! {
            <Layout active_section={*active_section} on_select={on_select} on_logout={on_logout} username={username}>
                { content }
            </Layout>
        }
    };

    html! {
        <ContextProvider<AppContext> context={ctx}>
            { body }
            <ToastContainer toasts={toasts.toasts.clone()} />
        </ContextProvider<AppContext>>
    }
}
