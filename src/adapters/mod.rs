//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter | Implements                                  | Connects to        |
//! |---------|---------------------------------------------|--------------------|
//! | `sim`   | PinCtlPort, RailPort, IrqLinePort, DelayNs  | in-memory journal  |
//! |         | WakeSourcePort                              | atomic counters    |
//! |         | BlankSubscriptionPort                       | registration flag  |

pub mod sim;
