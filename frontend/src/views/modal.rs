use yew::prelude::*;

use crate::views::icons::icon_close;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub title: String,
    pub on_close: Callback<()>,
    pub children: Children,
}

#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    let on_close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div class="fixed inset-0 z-40 flex items-center justify-center bg-black/40 p-4">
            <div class="w-full max-w-lg bg-card rounded-[10px] shadow-lg border border-border">
                <div class="flex items-center justify-between px-6 py-4 border-b border-border">
                    <h3 class="text-lg font-bold text-[#1D617A]">{ props.title.clone() }</h3>
                    <button type="button" class="text-muted-foreground hover:text-foreground" onclick={on_close}>
                        { icon_close() }
                    </button>
                </div>
                <div class="p-6">
                    { for props.children.iter() }
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfirmModalProps {
    pub message: &'static str,
    pub on_confirm: Callback<()>,
    pub on_cancel: Callback<()>,
}

/// Yes/no gate in front of destructive actions.
#[function_component(ConfirmModal)]
pub fn confirm_modal(props: &ConfirmModalProps) -> Html {
    let on_confirm = props.on_confirm.reform(|_: MouseEvent| ());
    let on_cancel = props.on_cancel.reform(|_: MouseEvent| ());

    html! {
        <Modal title="Please confirm" on_close={props.on_cancel.clone()}>
            <p class="text-sm text-foreground mb-6">{ props.message }</p>
            <div class="flex gap-3">
                <button type="button" onclick={on_confirm} class="flex-1 bg-red-600 text-white py-2 rounded-[10px] text-[12px] font-bold">
                    {"Delete"}
                </button>
                <button type="button" onclick={on_cancel} class="flex-1 bg-[#B2CBDE] text-[#173E63] py-2 rounded-[10px] text-[12px] font-bold">
                    {"Cancel"}
                </button>
            </div>
        </Modal>
    }
}
