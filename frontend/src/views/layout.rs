use yew::prelude::*;

use crate::app::Section;
use crate::views::icons::{
    icon_bar_chart, icon_layout_grid, icon_log_out, icon_settings, icon_tag, icon_wallet,
};

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_section: Section,
    pub on_select: Callback<Section>,
    pub on_logout: Callback<()>,
    pub username: String,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar
                    active_section={props.active_section}
                    on_select={props.on_select.clone()}
                    on_logout={props.on_logout.clone()}
                />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header username={props.username.clone()} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct HeaderProps {
    username: String,
}

#[function_component(Header)]
fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <span class="text-sm font-semibold text-[#173E63]">
                { format!("Welcome, {}!", props.username) }
            </span>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    section: Section,
    icon: fn() -> Html,
}

const NAV_ITEMS: [NavItem; 5] = [
    NavItem {
        label: "Dashboard",
        section: Section::Dashboard,
        icon: icon_layout_grid,
    },
    NavItem {
        label: "Expenses",
        section: Section::Expenses,
        icon: icon_wallet,
    },
    NavItem {
        label: "Categories",
        section: Section::Categories,
        icon: icon_tag,
    },
    NavItem {
        label: "Analytics",
        section: Section::Analytics,
        icon: icon_bar_chart,
    },
    NavItem {
        label: "Settings",
        section: Section::Settings,
        icon: icon_settings,
    },
];

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_section: Section,
    on_select: Callback<Section>,
    on_logout: Callback<()>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let on_logout = props.on_logout.reform(|_: MouseEvent| ());

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"Expense Tracker"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for NAV_ITEMS.iter().map(|item| {
                        let is_active = item.section == props.active_section;
                        let class_name = if is_active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let section = item.section;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(section))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"Log Out"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}
