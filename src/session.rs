use crate::timer::LogoutTimer;

/// The logged in account and its inactivity timer.
///
/// The session only names the account; the directory keeps ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSession {
    pub id: u64,
    pub username: String,
    pub timer: LogoutTimer,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(ActiveSession),
}

impl Session {
    #[inline]
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn(_))
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            Session::LoggedIn(active) => Some(active),
            Session::LoggedOut => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveSession> {
        match self {
            Session::LoggedIn(active) => Some(active),
            Session::LoggedOut => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.active().map(|a| a.username.as_str())
    }

    pub fn timer(&self) -> Option<&LogoutTimer> {
        self.active().map(|a| &a.timer)
    }

    /// Replaces the running timer, if any session is active.
    pub fn restart_timer(&mut self, timer: LogoutTimer) {
        if let Some(active) = self.active_mut() {
            active.timer = timer;
        }
    }

    /// Ends the session, returning what was active.
    pub fn end(&mut self) -> Option<ActiveSession> {
        match std::mem::take(self) {
            Session::LoggedIn(active) => Some(active),
            Session::LoggedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in() -> Session {
        Session::LoggedIn(ActiveSession {
            id: 1,
            username: "js".to_string(),
            timer: LogoutTimer::start(0, 300, 1000),
        })
    }

    #[test]
    fn test_default_is_logged_out() {
        let session = Session::default();
        assert!(!session.is_logged_in());
        assert!(session.username().is_none());
        assert!(session.timer().is_none());
    }

    #[test]
    fn test_restart_timer() {
        let mut session = logged_in();
        session.restart_timer(LogoutTimer::start(4000, 300, 1000));
        assert_eq!(session.timer().unwrap().next_tick_at(), 5000);

        let mut logged_out = Session::LoggedOut;
        logged_out.restart_timer(LogoutTimer::start(0, 300, 1000));
        assert!(logged_out.timer().is_none());
    }

    #[test]
    fn test_end() {
        let mut session = logged_in();
        let ended = session.end().unwrap();

        assert_eq!(ended.username, "js");
        assert_eq!(session, Session::LoggedOut);
        assert!(session.end().is_none());
    }
}
