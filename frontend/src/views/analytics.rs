use rust_decimal::Decimal;
use yew::prelude::*;

use crate::aggregate::{category_breakdown, category_total, monthly_trend};
use crate::app::{AppContext, Section};
use crate::format::format_currency;
use crate::views::charts::{BarChart, TrendChart};
use crate::views::page_shell;

#[function_component(AnalyticsPage)]
pub fn analytics_page() -> Html {
    let ctx = use_context::<AppContext>();

    {
        let ctx = ctx.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(ctx) = ctx {
                    ctx.reload(Section::Analytics);
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
    let (breakdown, trend, per_category) = {
        let cache = ctx.cache.borrow();
        let per_category: Vec<(String, Decimal)> = cache
            .categories()
            .iter()
            .map(|c| (c.name.clone(), category_total(&cache, c.id)))
            .collect();
        (category_breakdown(&cache), monthly_trend(&cache), per_category)
    };

    html! {
        { page_shell(
            "Analytics",
            html! {},
            html! {
                <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                    <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
                        <h4 class="text-[#1D617A] font-bold text-[15px] mb-4 tracking-wider">{"Expenses by Category"}</h4>
                        <BarChart points={breakdown} currency_symbol={symbol.clone()} />
                    </div>
                    <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
                        <h4 class="text-[#1D617A] font-bold text-[15px] mb-4 tracking-wider">{"Monthly Trend"}</h4>
                        <TrendChart points={trend} currency_symbol={symbol.clone()} />
                    </div>
                    <div class="lg:col-span-2 bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
                        <div class="px-6 py-4 border-b border-border">
                            <h4 class="text-[#1D617A] font-bold text-[15px] tracking-wider">{"Totals per Category"}</h4>
                        </div>
                        <table class="w-full text-left border-collapse">
                            <tbody class="divide-y divide-border">
                                { for per_category.iter().map(|(name, total)| html! {
                                    <tr class="text-sm">
                                        <td class="px-6 py-3 text-foreground">{ name.clone() }</td>
                                        <td class="px-6 py-3 text-right font-semibold text-foreground">{ format_currency(*total, &symbol) }</td>
                                    </tr>
                                }) }
                            </tbody>
                        </table>
                    </div>
                </div>
            }
        ) }
    }
}
