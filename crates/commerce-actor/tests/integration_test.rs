use async_trait::async_trait;
use commerce_actor::{ActorClient, ActorEntity, FrameworkError, ResourceActor, ResourceClient};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Coupon {
    code: String,
    uses_left: u32,
}

#[derive(Debug)]
enum CouponAction {
    Redeem,
}

#[derive(Debug, thiserror::Error)]
enum CouponError {
    #[error("coupon exhausted")]
    Exhausted,
    #[error("{0}")]
    Communication(String),
}

impl From<String> for CouponError {
    fn from(msg: String) -> Self {
        CouponError::Communication(msg)
    }
}

#[async_trait]
impl ActorEntity for Coupon {
    type Id = String;
    type Create = ();
    type Update = u32;
    type Action = CouponAction;
    type ActionResult = u32;
    type Context = ();
    type Error = CouponError;

    fn id(&self) -> String {
        self.code.clone()
    }

    fn from_create_params(code: String, _: ()) -> Result<Self, Self::Error> {
        Ok(Self { code, uses_left: 1 })
    }

    fn is_vacant(&self) -> bool {
        self.uses_left == 0
    }

    async fn on_update(&mut self, uses: u32, _ctx: &()) -> Result<(), Self::Error> {
        self.uses_left = uses;
        Ok(())
    }

    async fn handle_action(&mut self, action: CouponAction, _ctx: &()) -> Result<u32, Self::Error> {
        match action {
            CouponAction::Redeem => {
                if self.uses_left == 0 {
                    return Err(CouponError::Exhausted);
                }
                self.uses_left -= 1;
                Ok(self.uses_left)
            }
        }
    }
}

struct CouponClient {
    inner: ResourceClient<Coupon>,
}

#[async_trait]
impl ActorClient<Coupon> for CouponClient {
    type Error = CouponError;

    fn inner(&self) -> &ResourceClient<Coupon> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<CouponError>() {
            Ok(inner) => inner,
            Err(other) => CouponError::Communication(other.to_string()),
        }
    }
}

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, inner) = ResourceActor::<Coupon>::new(10);
    let handle = tokio::spawn(actor.run(()));
    let client = CouponClient { inner };

    // 1. Insert under caller-chosen keys
    for (code, uses) in [("SPRING", 2), ("AUTUMN", 1)] {
        client
            .inner()
            .insert(Coupon {
                code: code.into(),
                uses_left: uses,
            })
            .await
            .unwrap();
    }
    let codes: Vec<String> = client.list().await.unwrap().into_iter().map(|c| c.code).collect();
    assert_eq!(codes, vec!["AUTUMN", "SPRING"]);

    // 2. Redeem down to empty: the vacant coupon disappears
    let left = client
        .inner()
        .perform_action("AUTUMN".into(), CouponAction::Redeem)
        .await
        .unwrap();
    assert_eq!(left, 0);
    assert!(client.get("AUTUMN".into()).await.unwrap().is_none());

    // 3. Entity errors come back typed through map_error
    client.inner().update("SPRING".into(), 0).await.unwrap();
    let err = client
        .inner()
        .perform_action("SPRING".into(), CouponAction::Redeem)
        .await
        .map_err(CouponClient::map_error)
        .unwrap_err();
    assert!(matches!(err, CouponError::Communication(_)));

    client
        .inner()
        .upsert(Coupon {
            code: "WINTER".into(),
            uses_left: 0,
        })
        .await
        .unwrap();
    let err = client
        .inner()
        .perform_action("WINTER".into(), CouponAction::Redeem)
        .await
        .map_err(CouponClient::map_error)
        .unwrap_err();
    assert!(matches!(err, CouponError::Exhausted));

    // 4. Delete and shut down
    let removed = client.delete("WINTER".into()).await.unwrap();
    assert_eq!(removed.uses_left, 0);

    drop(client);
    handle.await.unwrap();
}
