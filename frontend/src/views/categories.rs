use std::collections::HashMap;
use std::rc::Rc;

use rust_decimal::Decimal;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::app::{AppContext, Section};
use crate::cache::DataCache;
use crate::format::format_currency;
use crate::models::{Category, CategoryDraft};
use crate::views::icons::{icon_edit, icon_plus, icon_tag, icon_trash};
use crate::views::modal::{ConfirmModal, Modal};
use crate::views::{input_value, page_shell};

/// Server-computed totals keyed by category id. Cards without an entry
/// show zero.
#[derive(Clone, Debug, Default, PartialEq)]
struct CategoryTotals(HashMap<i64, Decimal>);

impl CategoryTotals {
    fn get(&self, id: i64) -> Decimal {
        self.0.get(&id).copied().unwrap_or(Decimal::ZERO)
    }
}

impl Reducible for CategoryTotals {
    type Action = (i64, Decimal);

    fn reduce(self: Rc<Self>, (id, total): Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.0.insert(id, total);
        Rc::new(next)
    }
}

/// Server totals are refetched whenever this changes: on a new set of
/// categories and after every cache refresh, since expenses may have moved.
fn totals_key(cache: &DataCache, revision: u32) -> (Vec<i64>, u32) {
    (cache.categories().iter().map(|c| c.id).collect(), revision)
}

#[derive(Clone, PartialEq)]
enum EditorState {
    Closed,
    Adding,
    Editing(Category),
}

#[function_component(CategoriesPage)]
pub fn categories_page() -> Html {
    let ctx = use_context::<AppContext>();
    let totals = use_reducer(CategoryTotals::default);
    let editor = use_state(|| EditorState::Closed);
    let pending_delete = use_state(|| None::<i64>);

    {
        let ctx = ctx.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = ctx {
                    ctx.reload(Section::Categories);
                }
                || ()
            },
            (),
        );
    }

    let totals_deps = ctx
        .as_ref()
        .map(|ctx| totals_key(&ctx.cache.borrow(), ctx.revision()))
        .unwrap_or_default();

    {
        let ctx = ctx.clone();
        let dispatcher = totals.dispatcher();
        use_effect_with_deps(
            move |(ids, _): &(Vec<i64>, u32)| {
                if let Some(ctx) = ctx {
                    for id in ids.iter().copied() {
                        let ctx = ctx.clone();
                        let dispatcher = dispatcher.clone();
                        spawn_local(async move {
                            match ctx.api.category_total(id).await {
                                Ok(Some(total)) => dispatcher.dispatch((id, total)),
                                Ok(None) => {}
                                Err(err) => log::debug!("total for category {} unavailable: {}", id, err),
                            }
                        });
                    }
                }
                || ()
            },
            totals_deps,
        );
    }

    let Some(ctx) = ctx else {
        return html! {};
    };

    let on_add = {
        let editor = editor.clone();
        Callback::from(move |_: MouseEvent| editor.set(EditorState::Adding))
    };

    let on_close_editor = {
        let editor = editor.clone();
        Callback::from(move |_: ()| editor.set(EditorState::Closed))
    };

    let on_saved = {
        let editor = editor.clone();
        let ctx = ctx.clone();
        Callback::from(move |_: ()| {
            editor.set(EditorState::Closed);
            ctx.reload(Section::Categories);
        })
    };

    let on_confirm_delete = {
        let ctx = ctx.clone();
        let pending_delete = pending_delete.clone();
        Callback::from(move |_: ()| {
            let Some(id) = *pending_delete else {
                return;
            };
            pending_delete.set(None);
            let ctx = ctx.clone();
            spawn_local(async move {
                match ctx.api.delete_category(id).await {
                    Ok(Some(())) => {
                        ctx.cache.borrow_mut().remove_category(id);
                        ctx.cache_changed();
                        ctx.notifier.success("Category deleted successfully");
                    }
                    Ok(None) => {}
                    Err(err) => ctx.report(&err),
                }
            });
        })
    };

    let on_cancel_delete = {
        let pending_delete = pending_delete.clone();
        Callback::from(move |_: ()| pending_delete.set(None))
    };

    let symbol = ctx.currency_symbol();
    let categories: Vec<Category> = ctx.cache.borrow().categories().to_vec();

    let grid = if categories.is_empty() {
        html! { <p class="col-span-full text-center text-muted-foreground py-6">{"No categories found"}</p> }
    } else {
        html! {
            <>
                { for categories.iter().map(|category| {
                    let on_edit = {
                        let editor = editor.clone();
                        let category = category.clone();
                        Callback::from(move |_: MouseEvent| editor.set(EditorState::Editing(category.clone())))
                    };
                    let on_delete = {
                        let pending_delete = pending_delete.clone();
                        let id = category.id;
                        Callback::from(move |_: MouseEvent| pending_delete.set(Some(id)))
                    };
                    html! {
                        <div key={category.id} class="bg-card p-5 rounded-[10px] shadow-sm border border-border">
                            <div class="flex items-center justify-between mb-3">
                                <div class="flex items-center gap-2">
                                    <div class="p-1.5 bg-[#f1f5f9] rounded-lg">{ icon_tag() }</div>
                                    <span class="font-bold text-[#173E63]">{ category.name.clone() }</span>
                                </div>
                                <div class="flex gap-2">
                                    <button type="button" class="text-[#1D617A]" onclick={on_edit}>{ icon_edit() }</button>
                                    <button type="button" class="text-red-500" onclick={on_delete}>{ icon_trash() }</button>
                                </div>
                            </div>
                            <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">
                                { format_currency(totals.get(category.id), &symbol) }
                            </h3>
                        </div>
                    }
                }) }
            </>
        }
    };

    let editor_view = match &*editor {
        EditorState::Closed => html! {},
        EditorState::Adding => html! {
            <CategoryModal editing={None::<Category>} on_close={on_close_editor.clone()} on_saved={on_saved.clone()} />
        },
        EditorState::Editing(category) => html! {
            <CategoryModal editing={Some(category.clone())} on_close={on_close_editor.clone()} on_saved={on_saved.clone()} />
        },
    };

    html! {
        { page_shell(
            "Categories",
            html! {
                <button onclick={on_add} class="bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-[12px] font-bold flex items-center gap-2">
                    { icon_plus() }
                    {"Add Category"}
                </button>
            },
            html! {
                <>
                    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-6">
                        { grid }
                    </div>
                    { editor_view }
                    if pending_delete.is_some() {
                        <ConfirmModal
                            message="Are you sure you want to delete this category? This will also delete all associated expenses."
                            on_confirm={on_confirm_delete}
                            on_cancel={on_cancel_delete}
                        />
                    }
                </>
            }
        ) }
    }
}

#[derive(Properties, PartialEq)]
struct CategoryModalProps {
    editing: Option<Category>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
}

#[function_component(CategoryModal)]
fn category_modal(props: &CategoryModalProps) -> Html {
    let ctx = use_context::<AppContext>();
    let editing_id = props.editing.as_ref().map(|c| c.id);
    let name = use_state(|| {
        props
            .editing
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default()
    });
    let form_error = use_state(|| None::<String>);

    let on_submit = {
        let ctx = ctx.clone();
        let name = name.clone();
        let form_error = form_error.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(ctx) = ctx.clone() else {
                return;
            };
            let draft = CategoryDraft {
                name: name.trim().to_string(),
            };
            if let Err(msg) = draft.validate() {
                form_error.set(Some(msg));
                return;
            }
            form_error.set(None);

            let on_saved = on_saved.clone();
            spawn_local(async move {
                let result = match editing_id {
                    Some(id) => ctx.api.update_category(id, &draft).await,
                    None => ctx.api.create_category(&draft).await,
                };
                match result {
                    Ok(Some(())) => {
                        ctx.notifier.success(if editing_id.is_some() {
                            "Category updated successfully!"
                        } else {
                            "Category created successfully!"
                        });
                        on_saved.emit(());
                    }
                    Ok(None) => {}
                    Err(err) => ctx.report(&err),
                }
            });
        })
    };

    let on_cancel = props.on_close.reform(|_: MouseEvent| ());
    let title = if editing_id.is_some() {
        "Edit Category"
    } else {
        "Add Category"
    };

    html! {
        <Modal title={title} on_close={props.on_close.clone()}>
            <form class="space-y-4" onsubmit={on_submit}>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Name"}</label>
                    <input
                        type="text"
                        class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none"
                        value={(*name).clone()}
                        oninput={{
                            let name = name.clone();
                            Callback::from(move |e: InputEvent| {
                                if let Some(value) = input_value(&e) {
                                    name.set(value);
                                }
                            })
                        }}
                    />
                </div>

                if let Some(msg) = &*form_error {
                    <p class="text-sm text-red-500">{ msg.clone() }</p>
                }

                <div class="flex gap-3">
                    <button type="submit" class="flex-1 bg-[#173E63] text-white py-2 rounded-[10px] text-[12px] font-bold">{"Save"}</button>
                    <button type="button" onclick={on_cancel} class="flex-1 bg-[#B2CBDE] text-[#173E63] py-2 rounded-[10px] text-[12px] font-bold">{"Cancel"}</button>
                </div>
            </form>
        </Modal>
    }
}
