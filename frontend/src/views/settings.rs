use yew::prelude::*;

use crate::app::AppContext;
use crate::config::{AppSettings, CURRENCIES};
use crate::storage::BrowserStorage;
use crate::views::{page_shell, select_value};

#[function_component(SettingsPage)]
pub fn settings_page() -> Html {
    let ctx = use_context::<AppContext>();

    let Some(ctx) = ctx else {
        return html! {};
    };
    let current_currency = ctx.settings.currency_code.clone();

    let on_currency_change = {
        let ctx = ctx.clone();
        Callback::from(move |e: Event| {
            let Some(code) = select_value(&e) else {
                return;
            };
            let next = AppSettings::for_currency(&code);
            next.save(&BrowserStorage);
            log::info!("currency set to {}", next.currency_code);
            ctx.settings.set(next);
            ctx.notifier.success("Settings saved");
        })
    };

    html! {
        { page_shell(
            "Settings",
            html! {},
            html! {
                <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                    <div class="bg-card rounded-lg p-6 border border-border">
                        <h2 class="text-xl font-bold text-foreground mb-6">{"Preferences"}</h2>
                        <div>
                            <label class="block text-sm font-medium text-foreground mb-2">{"Currency"}</label>
                            <select onchange={on_currency_change} class="w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary">
                                { for CURRENCIES.iter().map(|(code, symbol)| html! {
                                    <option value={*code} selected={current_currency == *code}>
                                        { format!("{} ({})", code, symbol) }
                                    </option>
                                }) }
                            </select>
                            <p class="text-xs text-muted-foreground mt-2">{"Currency updates are applied across the dashboard and analytics."}</p>
                        </div>
                    </div>
                </div>
            }
        ) }
    }
}
