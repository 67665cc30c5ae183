use rust_decimal::Decimal;
use yew::prelude::*;

use crate::aggregate::{category_breakdown, dashboard_stats, recent_expenses};
use crate::app::{AppContext, Section};
use crate::format::{format_currency, format_date};
use crate::views::charts::BarChart;
use crate::views::icons::{icon_calendar, icon_clock, icon_tag, icon_wallet};
use crate::views::page_shell;

#[derive(Clone, Copy, PartialEq)]
enum StatIcon {
    Wallet,
    Calendar,
    Tag,
    Clock,
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    title: &'static str,
    value: String,
    icon: StatIcon,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ props.value.clone() }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::Wallet => icon_wallet(),
                        StatIcon::Calendar => icon_calendar(),
                        StatIcon::Tag => icon_tag(),
                        StatIcon::Clock => icon_clock(),
                    }
                }
            </div>
        </div>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let ctx = use_context::<AppContext>();

    {
        let ctx = ctx.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = ctx {
                    ctx.reload(Section::Dashboard);
                }
                || ()
            },
            (),
        );
    }

    let Some(ctx) = ctx else {
        return html! {};
    };
    let symbol = ctx.currency_symbol();
    let cache = ctx.cache.borrow();
    let stats = dashboard_stats(&cache);
    let breakdown: Vec<(String, Decimal)> = category_breakdown(&cache);
    let recent = if recent_expenses(&cache).is_empty() {
        html! { <p class="px-6 py-6 text-center text-sm text-muted-foreground">{"No expenses yet."}</p> }
    } else {
        html! {
            <ul class="divide-y divide-border">
                { for recent_expenses(&cache).iter().map(|expense| html! {
                    <li key={expense.id} class="px-6 py-3 flex items-center justify-between text-sm">
                        <div>
                            <p class="font-semibold text-foreground">{ expense.description.clone() }</p>
                            <p class="text-[11px] text-muted-foreground">
                                { format!("{} · {}", cache.category_name(expense.category_id), format_date(expense.date)) }
                            </p>
                        </div>
                        <span class="font-semibold text-[#173E63]">{ format_currency(expense.amount, &symbol) }</span>
                    </li>
                }) }
            </ul>
        }
    };
    drop(cache);

    html! {
        { page_shell(
            "Dashboard",
            html! {},
            html! {
                <>
                    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-4 gap-6">
                        <StatCard title="Total Expenses" value={format_currency(stats.total, &symbol)} icon={StatIcon::Wallet} />
                        <StatCard title="This Month" value={format_currency(stats.monthly, &symbol)} icon={StatIcon::Calendar} />
                        <StatCard title="Categories" value={stats.category_count.to_string()} icon={StatIcon::Tag} />
                        <StatCard title="Recent" value={stats.recent_count.to_string()} icon={StatIcon::Clock} />
                    </div>

                    <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
                            <h4 class="text-[#1D617A] font-bold text-[15px] mb-4 tracking-wider">{"Spending by Category"}</h4>
                            <BarChart points={breakdown} currency_symbol={symbol.clone()} />
                        </div>

                        <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
                            <div class="px-6 py-4 border-b border-border">
                                <h4 class="text-[#1D617A] font-bold text-[15px] tracking-wider">{"Recent Expenses"}</h4>
                            </div>
                            { recent }
                        </div>
                    </div>
                </>
            }
        ) }
    }
}
