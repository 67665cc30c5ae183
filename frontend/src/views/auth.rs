use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::app::AppContext;
use crate::models::{Credentials, Registration, Role};
use crate::views::{input_value, select_value};

const INPUT_CLASS: &str = "w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary";

#[derive(Properties, PartialEq)]
pub struct AuthScreenProps {
    pub on_authenticated: Callback<()>,
}

#[function_component(AuthScreen)]
pub fn auth_screen(props: &AuthScreenProps) -> Html {
    let ctx = use_context::<AppContext>();
    let is_login = use_state(|| true);
    let username = use_state(|| "".to_string());
    let password = use_state(|| "".to_string());
    let role = use_state(|| "USER".to_string());
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let ctx = ctx.clone();
        let is_login = is_login.clone();
        let username = username.clone();
        let password = password.clone();
        let role = role.clone();
        let error = error.clone();
        let loading = loading.clone();
        let on_authenticated = props.on_authenticated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(ctx) = ctx.clone() else {
                return;
            };
            let username_val = username.trim().to_string();
            let password_val = (*password).clone();

            if username_val.is_empty() || password_val.is_empty() {
                error.set(Some("Username and password are required".to_string()));
                return;
            }

            loading.set(true);
            error.set(None);

            let login_mode = *is_login;
            let role_val = Role::from_code(&role);
            let is_login = is_login.clone();
            let password = password.clone();
            let error = error.clone();
            let loading = loading.clone();
            let on_authenticated = on_authenticated.clone();
            spawn_local(async move {
                if login_mode {
                    let credentials = Credentials {
                        username: username_val,
                        password: password_val,
                    };
                    match ctx.api.login(&credentials).await {
                        Ok(_) => {
                            loading.set(false);
                            on_authenticated.emit(());
                            return;
                        }
                        Err(err) => {
                            let msg = err.user_message();
                            ctx.notifier.error(msg.clone());
                            error.set(Some(msg));
                        }
                    }
                } else {
                    let registration = Registration {
                        username: username_val,
                        password: password_val,
                        role: role_val,
                    };
                    match ctx.api.register(&registration).await {
                        Ok(()) => {
                            ctx.notifier
                                .success("Registration successful! Please login.");
                            password.set("".to_string());
                            is_login.set(true);
                        }
                        Err(err) => {
                            let msg = err.user_message();
                            ctx.notifier.error(msg.clone());
                            error.set(Some(msg));
                        }
                    }
                }
                loading.set(false);
            });
        })
    };

    let toggle_mode = {
        let is_login = is_login.clone();
        let error = error.clone();
        Callback::from(move |_| {
            error.set(None);
            is_login.set(!*is_login);
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ if *is_login { "Welcome back" } else { "Create account" } }</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if *is_login { "Sign in to track your expenses." } else { "Start tracking where your money goes." } }
                    </p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Username"}</label>
                        <input
                            type="text"
                            class={INPUT_CLASS}
                            value={(*username).clone()}
                            oninput={{
                                let username = username.clone();
                                Callback::from(move |e: InputEvent| {
                                    if let Some(value) = input_value(&e) {
                                        username.set(value);
                                    }
                                })
                            }}
                        />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Password"}</label>
                        <input
                            type="password"
                            class={INPUT_CLASS}
                            value={(*password).clone()}
                            oninput={{
                                let password = password.clone();
                                Callback::from(move |e: InputEvent| {
                                    if let Some(value) = input_value(&e) {
                                        password.set(value);
                                    }
                                })
                            }}
                        />
                    </div>

                    if !*is_login {
                        <div class="space-y-1">
                            <label class="text-sm font-medium text-foreground">{"Role"}</label>
                            <select
                                class={INPUT_CLASS}
                                onchange={{
                                    let role = role.clone();
                                    Callback::from(move |e: Event| {
                                        if let Some(value) = select_value(&e) {
                                            role.set(value);
                                        }
                                    })
                                }}
                            >
                                <option value="USER" selected={*role == "USER"}>{"User"}</option>
                                <option value="ADMIN" selected={*role == "ADMIN"}>{"Admin"}</option>
                            </select>
                        </div>
                    }

                    if let Some(msg) = &*error {
                        <div class="text-sm text-red-500">{ msg.clone() }</div>
                    }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else if *is_login { "Login" } else { "Register" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if *is_login { "No account?" } else { "Already have an account?" } }
                    <button class="ml-2 text-primary font-semibold" onclick={toggle_mode}>
                        { if *is_login { "Register" } else { "Login" } }
                    </button>
                </div>
            </div>
        </div>
    }
}
