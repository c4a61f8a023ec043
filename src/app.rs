use iocraft::prelude::*;

use crate::config::types::AppConfig;
use crate::engine::EngineHandle;
use crate::theme::ResolvedTheme;
use crate::views::catalog::CatalogView;

// ---------------------------------------------------------------------------
// Root App component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct AppProps<'a> {
    pub config: Option<&'a AppConfig>,
    pub engine: Option<&'a EngineHandle>,
    pub theme: Option<&'a ResolvedTheme>,
}

#[component]
pub fn App<'a>(props: &AppProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let should_exit = hooks.use_state(|| false);

    if should_exit.get() {
        system.exit();
    }

    element! {
        View(width: u32::from(width), height: u32::from(height), flex_direction: FlexDirection::Column) {
            CatalogView(
                config: props.config,
                engine: props.engine,
                theme: props.theme,
                width,
                height,
                should_exit,
            )
        }
    }
}
