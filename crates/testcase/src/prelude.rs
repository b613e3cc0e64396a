//! Common imports for tests.

pub use crate::{
    ContentOptions, IntegrationTestCase, MemoryTestCase, ResponseExpectations, init_test_logging,
};
pub use expanse_application::ports::{RouteArgs, TestClient};
pub use expanse_application::use_cases::{LoginAs, PageOptions};
pub use expanse_application::{ApplicationError, ApplicationResult};
pub use expanse_domain::{
    AssertionError, AssertionResult, ExpectedContent, ExpectedValue, Message, PageRequest,
    ResponseContext, Settings, StatusExpectation, TestResponse, TestUser,
};
pub use expanse_infrastructure::{
    Loader, MemoryTestClient, ReqwestTestClient, StaticRouteResolver,
};
