mod client;
mod components;
pub mod controller;
mod hooks;
mod pages;
pub mod storage;
pub mod utils;

use components::{SidebarClosedIcon, SidebarOpenIcon};
use hooks::use_local_storage;
use pages::ChatPage;
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| utils::widget_config());
    let collapsed = use_local_storage::<bool>(config.sidebar_key.clone().into());

    let on_toggle = {
        let set = collapsed.set.clone();
        let value = collapsed.value;
        Callback::from(move |_: MouseEvent| set.emit(!value))
    };

    let (toggle_icon, toggle_title) = if collapsed.value {
        (html! { <SidebarClosedIcon /> }, "Open sidebar")
    } else {
        (html! { <SidebarOpenIcon /> }, "Close sidebar")
    };

    html! {
        <div class={classes!("app", collapsed.value.then_some("sidebar-collapsed"))}>
            <header class="top-bar">
                <button
                    id="toggleSidebarButton"
                    class="toggle-sidebar-btn"
                    title={toggle_title}
                    onclick={on_toggle}
                >
                    { toggle_icon }
                </button>
            </header>
            <ChatPage config={(*config).clone()} />
        </div>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
