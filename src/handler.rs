//! Message Handler
//!
//! Entry point for delivered transactions: stateless validation, then
//! exhaustive dispatch to the handler of each message variant.
//!
//! Created: 2026-10-17

use tracing::debug;

use crate::errors::BancorResult;
use crate::events::Response;
use crate::keeper::BancorKeeper;
use crate::keepers::{BankKeeper, MarketKeeper, TokenKeeper};
use crate::msgs::Msg;
use crate::params::Params;
use crate::store::KvStore;
use crate::types::BlockContext;

impl<S, T, M, B> BancorKeeper<S, T, M, B>
where
    S: KvStore,
    T: TokenKeeper,
    M: MarketKeeper,
    B: BankKeeper,
{
    /// Handle one message against the current state.
    ///
    /// The result depends only on the state, `params` and `msg`. On error
    /// the caller must discard any ledger or store writes of this call.
    pub fn handle(&mut self, ctx: &BlockContext, params: &Params, msg: &Msg) -> BancorResult<Response> {
        msg.validate_basic()?;
        let result = match msg {
            Msg::Init(m) => self.init_pool(ctx, params, m),
            Msg::Trade(m) => self.trade(ctx, params, m),
            Msg::Cancel(m) => self.cancel_pool(ctx, params, m),
        };
        if let Err(e) = &result {
            debug!(
                "Rejected {} from {} at height {}: {} (code {})",
                msg.kind(),
                msg.signer(),
                ctx.height,
                e,
                e.code()
            );
        }
        result
    }
}
