#![allow(dead_code)]

use agnostic_router::{
    Adapter, BoxFuture, HandlerResult, Method, MultiValueMap, Request, Response, RouterError,
    Underlying,
};

/// A platform event as a test double for a real runtime's request type.
#[derive(Debug, Clone)]
pub struct FakeEvent {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl FakeEvent {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }
}

/// The reply shape of the fake platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeReply {
    pub status: u16,
    pub headers: MultiValueMap,
    pub body: String,
}

pub struct FakeAdapter;

impl Adapter for FakeAdapter {
    type Native = FakeEvent;
    type Reply = FakeReply;

    fn map_request(&self, native: FakeEvent) -> Result<Request, RouterError> {
        let method = Method::parse(&native.method)
            .ok_or_else(|| RouterError::Adapter(format!("unsupported method {}", native.method)))?;
        let mut req = Request::from_url(method, &native.url);
        for (key, value) in &native.headers {
            req = req.header(key, value.clone());
        }
        req.body = native.body.clone().unwrap_or_default();
        Ok(req.underlying(Underlying::new(native)))
    }

    fn map_response(&self, response: Response) -> Result<FakeReply, RouterError> {
        if !response.ended {
            return Err(RouterError::Adapter("response was never ended".to_string()));
        }
        Ok(FakeReply {
            status: response.status_code,
            headers: response.headers,
            body: response.body,
        })
    }
}

pub fn ok_handler<'a>(_req: &'a mut Request, res: &'a mut Response) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        res.send("ok");
        Ok(())
    })
}

/// Echoes the matched path params as JSON.
pub fn params_handler<'a>(
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        res.json(&req.params)?;
        Ok(())
    })
}

/// Echoes whether the handler can see the platform event.
pub fn underlying_handler<'a>(
    req: &'a mut Request,
    res: &'a mut Response,
) -> BoxFuture<'a, HandlerResult> {
    Box::pin(async move {
        let url = req
            .underlying
            .downcast_ref::<FakeEvent>()
            .map(|event| event.url.clone())
            .unwrap_or_default();
        res.send(url);
        Ok(())
    })
}
