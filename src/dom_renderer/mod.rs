// DOMへの描画アダプタ
// markup はネイティブでも使う（シミュレータの HTML 出力）

pub mod markup;

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod site;
#[cfg(target_arch = "wasm32")]
pub mod widgets;

#[cfg(target_arch = "wasm32")]
pub use dom::DomCarousel;
#[cfg(target_arch = "wasm32")]
pub use site::{DomAvatar, DomLogin, DomSidebar, DomVideo};
#[cfg(target_arch = "wasm32")]
pub use widgets::{DomAccordion, DomExpander, DomPager, DomPricing};
