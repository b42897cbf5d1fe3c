pub mod work_package_flow;

pub use work_package_flow::WorkPackageFlow;
