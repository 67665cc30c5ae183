use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::app::AppContext;
use crate::notify::{Toast, ToastKind, TOAST_TIMEOUT_MS};

#[derive(Properties, PartialEq)]
pub struct ToastContainerProps {
    pub toasts: Vec<Toast>,
}

#[function_component(ToastContainer)]
pub fn toast_container(props: &ToastContainerProps) -> Html {
    html! {
        <div class="fixed top-4 right-4 z-50 flex flex-col gap-2 w-80">
            { for props.toasts.iter().map(|toast| html! {
                <ToastItem key={toast.id} toast={toast.clone()} />
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    toast: Toast,
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    let ctx = use_context::<AppContext>();
    let id = props.toast.id;

    {
        let notifier = ctx.as_ref().map(|c| c.notifier.clone());
        use_effect_with_deps(
            move |_| {
                let timeout = notifier.map(|notifier| {
                    Timeout::new(TOAST_TIMEOUT_MS, move || notifier.dismiss(id))
                });
                move || drop(timeout)
            },
            id,
        );
    }

    let on_dismiss = {
        let ctx = ctx.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(ctx) = &ctx {
                ctx.notifier.dismiss(id);
            }
        })
    };

    let class_name = match props.toast.kind {
        ToastKind::Success => "bg-emerald-600 text-white",
        ToastKind::Error => "bg-red-600 text-white",
        ToastKind::Info => "bg-[#173E63] text-white",
    };

    html! {
        <div class={format!("flex items-start justify-between gap-3 px-4 py-3 rounded-[10px] shadow-lg text-sm {}", class_name)}>
            <span>{ props.toast.message.clone() }</span>
            <button type="button" class="opacity-80 hover:opacity-100" onclick={on_dismiss}>{"×"}</button>
        </div>
    }
}
