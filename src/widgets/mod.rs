// カルーセル以外のページ上の小さなウィジェット

pub mod accordion;
pub mod avatar;
pub mod expander;
pub mod login;
pub mod pager;
pub mod pricing;
pub mod sidebar;
pub mod video;

pub use accordion::Accordion;
pub use avatar::AvatarPreview;
pub use expander::{HeightEqualizer, MinHeight, ReadMore, ResizeDebounce};
pub use login::{LoginMode, LoginView, PasswordVisibility};
pub use pager::{PagerScroll, TestimonialPager};
pub use pricing::{BillingPeriod, PriceDisplay, PricingToggle};
pub use sidebar::{Sidebar, SidebarChange};
pub use video::VideoEmbed;
