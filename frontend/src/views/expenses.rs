use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ExpenseFilter;
use crate::app::{AppContext, Section};
use crate::error::ApiError;
use crate::format::{format_currency, format_date};
use crate::models::{Category, Expense, ExpenseDraft};
use crate::views::icons::{icon_edit, icon_plus, icon_trash};
use crate::views::modal::{ConfirmModal, Modal};
use crate::views::{input_value, page_shell, select_value};

const FIELD_CLASS: &str =
    "w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none";

#[derive(Clone, PartialEq)]
enum EditorState {
    Closed,
    Adding,
    Editing(Expense),
}

/// Turns raw form fields into a validated draft.
fn parse_expense_form(
    amount: &str,
    description: &str,
    date: &str,
    category: &str,
    today: NaiveDate,
) -> Result<ExpenseDraft, ApiError> {
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ApiError::Validation("Amount must be a number.".to_string()))?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| ApiError::Validation("Please pick a date.".to_string()))?;
    let category_id = category
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::Validation("Please select a category.".to_string()))?;

    let draft = ExpenseDraft {
        amount,
        description: description.trim().to_string(),
        date,
        category_id,
    };
    draft.validate(today).map_err(ApiError::Validation)?;
    Ok(draft)
}

#[function_component(ExpensesPage)]
pub fn expenses_page() -> Html {
    let ctx = use_context::<AppContext>();
    let filter_category = use_state(|| "".to_string());
    let filter_from = use_state(|| "".to_string());
    let filter_to = use_state(|| "".to_string());
    let editor = use_state(|| EditorState::Closed);
    let pending_delete = use_state(|| None::<i64>);

    {
        let ctx = ctx.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = ctx {
                    ctx.reload(Section::Expenses);
                }
                || ()
            },
            (),
        );
    }

    let Some(ctx) = ctx else {
        return html! {};
    };

    let on_apply = {
        let ctx = ctx.clone();
        let filter_category = filter_category.clone();
        let filter_from = filter_from.clone();
        let filter_to = filter_to.clone();
        Callback::from(move |_: MouseEvent| {
            let filter = ExpenseFilter::from_inputs(&filter_category, &filter_from, &filter_to);
            log::debug!("applying expense filter {:?}", filter);
            ctx.apply_filter(filter, Some("Filters applied successfully"));
        })
    };

    let on_clear = {
        let ctx = ctx.clone();
        let filter_category = filter_category.clone();
        let filter_from = filter_from.clone();
        let filter_to = filter_to.clone();
        Callback::from(move |_: MouseEvent| {
            filter_category.set("".to_string());
            filter_from.set("".to_string());
            filter_to.set("".to_string());
            ctx.apply_filter(ExpenseFilter::All, None);
            ctx.notifier.info("Filters cleared");
        })
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
            ctx.reload(Section::Expenses);
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
                match ctx.api.delete_expense(id).await {
                    Ok(Some(())) => {
                        ctx.notifier.success("Expense deleted successfully!");
                        ctx.reload(Section::Expenses);
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
    let cache = ctx.cache.borrow();
    let categories: Vec<Category> = cache.categories().to_vec();
    let rows = if cache.expenses().is_empty() {
        html! { <tr><td colspan="5" class="px-8 py-6 text-center text-muted-foreground">{"No expenses found."}</td></tr> }
    } else {
        html! {
            <>
                { for cache.expenses().iter().map(|expense| {
                    let on_edit = {
                        let editor = editor.clone();
                        let expense = expense.clone();
                        Callback::from(move |_: MouseEvent| editor.set(EditorState::Editing(expense.clone())))
                    };
                    let on_delete = {
                        let pending_delete = pending_delete.clone();
                        let id = expense.id;
                        Callback::from(move |_: MouseEvent| pending_delete.set(Some(id)))
                    };
                    html! {
                        <tr key={expense.id} class="text-sm hover:bg-muted/40 transition-colors">
                            <td class="px-8 py-4 text-muted-foreground">{ format_date(expense.date) }</td>
                            <td class="px-8 py-4 text-foreground">{ expense.description.clone() }</td>
                            <td class="px-8 py-4">
                                <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">
                                    { cache.category_name(expense.category_id).to_string() }
                                </span>
                            </td>
                            <td class="px-8 py-4 font-semibold text-foreground">{ format_currency(expense.amount, &symbol) }</td>
                            <td class="px-8 py-4">
                                <div class="flex gap-2">
                                    <button type="button" class="text-[#1D617A]" onclick={on_edit}>{ icon_edit() }</button>
                                    <button type="button" class="text-red-500" onclick={on_delete}>{ icon_trash() }</button>
                                </div>
                            </td>
                        </tr>
                    }
                }) }
            </>
        }
    };
    drop(cache);

    let editor_view = match &*editor {
        EditorState::Closed => html! {},
        EditorState::Adding => html! {
            <ExpenseModal editing={None::<Expense>} categories={categories.clone()} on_close={on_close_editor.clone()} on_saved={on_saved.clone()} />
        },
        EditorState::Editing(expense) => html! {
            <ExpenseModal editing={Some(expense.clone())} categories={categories.clone()} on_close={on_close_editor.clone()} on_saved={on_saved.clone()} />
        },
    };

    let confirm_view = if pending_delete.is_some() {
        html! {
            <ConfirmModal
                message="Are you sure you want to delete this expense?"
                on_confirm={on_confirm_delete}
                on_cancel={on_cancel_delete}
            />
        }
    } else {
        html! {}
    };

    html! {
        { page_shell(
            "Expenses",
            html! {
                <button onclick={on_add} class="bg-[#173E63] text-white px-4 py-2 rounded-[10px] text-[12px] font-bold flex items-center gap-2">
                    { icon_plus() }
                    {"Add Expense"}
                </button>
            },
            html! {
                <>
                    <div class="bg-white p-5 rounded-[10px] shadow-sm border border-white/50">
                        <div class="grid grid-cols-1 md:grid-cols-5 gap-3 items-end">
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-muted-foreground">{"Category"}</label>
                                <select class={FIELD_CLASS} onchange={{
                                    let filter_category = filter_category.clone();
                                    Callback::from(move |e: Event| {
                                        if let Some(value) = select_value(&e) {
                                            filter_category.set(value);
                                        }
                                    })
                                }}>
                                    <option value="" selected={filter_category.is_empty()}>{"All Categories"}</option>
                                    { for categories.iter().map(|category| {
                                        let value = category.id.to_string();
                                        let selected = *filter_category == value;
                                        html! { <option value={value} selected={selected}>{ category.name.clone() }</option> }
                                    }) }
                                </select>
                            </div>
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-muted-foreground">{"From"}</label>
                                <input type="date" class={FIELD_CLASS} value={(*filter_from).clone()} oninput={{
                                    let filter_from = filter_from.clone();
                                    Callback::from(move |e: InputEvent| {
                                        if let Some(value) = input_value(&e) {
                                            filter_from.set(value);
                                        }
                                    })
                                }} />
                            </div>
                            <div class="space-y-1">
                                <label class="text-[12px] font-bold text-muted-foreground">{"To"}</label>
                                <input type="date" class={FIELD_CLASS} value={(*filter_to).clone()} oninput={{
                                    let filter_to = filter_to.clone();
                                    Callback::from(move |e: InputEvent| {
                                        if let Some(value) = input_value(&e) {
                                            filter_to.set(value);
                                        }
                                    })
                                }} />
                            </div>
                            <button onclick={on_apply} class="bg-[#173E63] text-white py-2 rounded-[10px] text-[12px] font-bold">{"Apply Filters"}</button>
                            <button onclick={on_clear} class="bg-[#B2CBDE] text-[#173E63] py-2 rounded-[10px] text-[12px] font-bold">{"Clear"}</button>
                        </div>
                    </div>

                    <div class="bg-card rounded-2xl shadow-md border border-border overflow-hidden">
                        <div class="overflow-x-auto">
                            <table class="w-full text-left border-collapse">
                                <thead>
                                    <tr class="bg-muted text-muted-foreground text-[10px] uppercase tracking-widest">
                                        <th class="px-8 py-4 font-bold">{"Date"}</th>
                                        <th class="px-8 py-4 font-bold">{"Description"}</th>
                                        <th class="px-8 py-4 font-bold">{"Category"}</th>
                                        <th class="px-8 py-4 font-bold">{"Amount"}</th>
                                        <th class="px-8 py-4 font-bold">{"Actions"}</th>
                                    </tr>
                                </thead>
                                <tbody class="divide-y divide-border">
                                    { rows }
                                </tbody>
                            </table>
                        </div>
                    </div>

                    { editor_view }
                    { confirm_view }
                </>
            }
        ) }
    }
}

#[derive(Properties, PartialEq)]
struct ExpenseModalProps {
    editing: Option<Expense>,
    categories: Vec<Category>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
}

#[function_component(ExpenseModal)]
fn expense_modal(props: &ExpenseModalProps) -> Html {
    let ctx = use_context::<AppContext>();
    let editing_id = props.editing.as_ref().map(|e| e.id);

    let amount = use_state(|| {
        props
            .editing
            .as_ref()
            .map(|e| e.amount.to_string())
            .unwrap_or_default()
    });
    let description = use_state(|| {
        props
            .editing
            .as_ref()
            .map(|e| e.description.clone())
            .unwrap_or_default()
    });
    let date = use_state(|| {
        let date = props
            .editing
            .as_ref()
            .map(|e| e.date)
            .unwrap_or_else(|| Local::now().date_naive());
        date.format("%Y-%m-%d").to_string()
    });
    let category = use_state(|| {
        props
            .editing
            .as_ref()
            .map(|e| e.category_id.to_string())
            .unwrap_or_default()
    });
    let form_error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let on_submit = {
        let ctx = ctx.clone();
        let amount = amount.clone();
        let description = description.clone();
        let date = date.clone();
        let category = category.clone();
        let form_error = form_error.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(ctx) = ctx.clone() else {
                return;
            };
            let today = Local::now().date_naive();
            let draft = match parse_expense_form(&amount, &description, &date, &category, today) {
                Ok(draft) => draft,
                Err(err) => {
                    form_error.set(Some(err.user_message()));
                    return;
                }
            };

            form_error.set(None);
            saving.set(true);

            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                let result = match editing_id {
                    Some(id) => ctx.api.update_expense(id, &draft).await,
                    None => ctx.api.create_expense(&draft).await,
                };
                saving.set(false);
                match result {
                    Ok(Some(())) => {
                        ctx.notifier.success(if editing_id.is_some() {
                            "Expense updated successfully!"
                        } else {
                            "Expense created successfully!"
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
        "Edit Expense"
    } else {
        "Add Expense"
    };

    html! {
        <Modal title={title} on_close={props.on_close.clone()}>
            <form class="space-y-4" onsubmit={on_submit}>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Amount"}</label>
                    <input type="number" step="0.01" min="0.1" class={FIELD_CLASS} value={(*amount).clone()} oninput={{
                        let amount = amount.clone();
                        Callback::from(move |e: InputEvent| {
                            if let Some(value) = input_value(&e) {
                                amount.set(value);
                            }
                        })
                    }} />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Description"}</label>
                    <input type="text" class={FIELD_CLASS} value={(*description).clone()} oninput={{
                        let description = description.clone();
                        Callback::from(move |e: InputEvent| {
                            if let Some(value) = input_value(&e) {
                                description.set(value);
                            }
                        })
                    }} />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Date"}</label>
                    <input type="date" class={FIELD_CLASS} value={(*date).clone()} oninput={{
                        let date = date.clone();
                        Callback::from(move |e: InputEvent| {
                            if let Some(value) = input_value(&e) {
                                date.set(value);
                            }
                        })
                    }} />
                </div>
                <div class="space-y-1">
                    <label class="text-[12px] font-bold text-muted-foreground">{"Category"}</label>
                    <select class={FIELD_CLASS} onchange={{
                        let category = category.clone();
                        Callback::from(move |e: Event| {
                            if let Some(value) = select_value(&e) {
                                category.set(value);
                            }
                        })
                    }}>
                        <option value="" selected={category.is_empty()}>{"Select a category"}</option>
                        { for props.categories.iter().map(|c| {
                            let value = c.id.to_string();
                            let selected = *category == value;
                            html! { <option value={value} selected={selected}>{ c.name.clone() }</option> }
                        }) }
                    </select>
                </div>

                if let Some(msg) = &*form_error {
                    <p class="text-sm text-red-500">{ msg.clone() }</p>
                }

                <div class="flex gap-3">
                    <button type="submit" class="flex-1 bg-[#173E63] text-white py-2 rounded-[10px] text-[12px] font-bold" disabled={*saving}>
                        { if *saving { "Saving..." } else { "Save" } }
                    </button>
                    <button type="button" onclick={on_cancel} class="flex-1 bg-[#B2CBDE] text-[#173E63] py-2 rounded-[10px] text-[12px] font-bold">
                        {"Cancel"}
                    </button>
                </div>
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
    }

    #[test]
    fn complete_form_becomes_a_draft() {
        let draft = parse_expense_form("12.50", "  Lunch ", "2024-04-10", "3", today()).unwrap();
        assert_eq!(
            draft,
            ExpenseDraft {
                amount: Decimal::new(1250, 2),
                description: "Lunch".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
                category_id: 3,
            }
        );
    }

    #[rstest]
    #[case("abc", "Lunch", "2024-04-10", "3", "Amount must be a number.")]
    #[case("12", "Lunch", "", "3", "Please pick a date.")]
    #[case("12", "Lunch", "2024-04-10", "", "Please select a category.")]
    #[case("0.05", "Lunch", "2024-04-10", "3", "Amount must be at least 0.10.")]
    #[case("12", "   ", "2024-04-10", "3", "Description is required.")]
    #[case("12", "Lunch", "2024-05-01", "3", "Date cannot be in the future.")]
    fn bad_forms_are_rejected(
        #[case] amount: &str,
        #[case] description: &str,
        #[case] date: &str,
        #[case] category: &str,
        #[case] message: &str,
    ) {
        let err = parse_expense_form(amount, description, date, category, today()).unwrap_err();
        assert_eq!(err, ApiError::Validation(message.to_string()));
    }
}
